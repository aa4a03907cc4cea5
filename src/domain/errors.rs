//! Domain Errors
//!
//! Fatal pipeline errors, per-hop resolution failures and cache persistence
//! errors.

use std::path::PathBuf;

/// The trace command could not produce usable output.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Why a single hop could not be located.
///
/// Resolution failures never abort the pipeline; the hop is simply left out
/// of the result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionFailure {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("lookup timed out")]
    Timeout,
    #[error("service answered with HTTP {0}")]
    HttpStatus(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("service rejected lookup: {0}")]
    Rejected(String),
    #[error("lookup failed on an earlier run")]
    PreviouslyFailed,
}

impl ResolutionFailure {
    /// Whether the service itself answered that the address cannot be
    /// located (private or reserved range). Transport problems, timeouts,
    /// error statuses and unreadable bodies may pass on a later run.
    pub fn is_definitive(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// The cache file could not be written.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Conditions that end a pipeline run without a path.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("traceroute failed: {0}")]
    Trace(#[from] TraceError),
    #[error("no hop addresses found in the traceroute output")]
    NoHops,
    #[error("none of the {hops} hops could be located")]
    AllResolutionsFailed { hops: usize },
}

impl PipelineError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Trace(_) => 1,
            Self::NoHops => 2,
            Self::AllResolutionsFailed { .. } => 3,
        }
    }
}
