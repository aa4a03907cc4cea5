//! Command Trace Runner
//!
//! Implements TraceRunner by spawning the platform trace utility.

use crate::domain::errors::TraceError;
use crate::domain::ports::TraceRunner;
use async_trait::async_trait;
use tokio::process::Command;

/// Which executable to run for a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceCommand {
    /// Windows `tracert`
    Tracert,
    /// POSIX `traceroute`
    Traceroute,
    /// Any other program taking the target as its only argument
    Custom(String),
}

impl TraceCommand {
    /// `tracert` on Windows, `traceroute` everywhere else.
    pub fn for_current_platform() -> Self {
        if cfg!(windows) {
            Self::Tracert
        } else {
            Self::Traceroute
        }
    }

    pub fn program(&self) -> &str {
        match self {
            Self::Tracert => "tracert",
            Self::Traceroute => "traceroute",
            Self::Custom(program) => program.as_str(),
        }
    }
}

/// Runs a trace as a child process and captures its standard output.
pub struct CommandTraceRunner {
    command: TraceCommand,
}

impl CommandTraceRunner {
    pub fn new(command: TraceCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl TraceRunner for CommandTraceRunner {
    async fn run(&self, target: &str) -> Result<String, TraceError> {
        let program = self.command.program();
        tracing::debug!("running `{} {}`", program, target);

        let output = Command::new(program)
            .arg(target)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| TraceError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(TraceError::Failed {
                program: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
