//! Trace Runner Port
//!
//! Defines the interface for running a route trace to a target.

use crate::domain::errors::TraceError;
use async_trait::async_trait;

/// Runs a platform trace utility and captures its output.
#[async_trait]
pub trait TraceRunner: Send + Sync {
    /// Trace the route to `target` (hostname or IP literal, unvalidated).
    ///
    /// Returns the captured standard output when the command exits with
    /// status zero.
    async fn run(&self, target: &str) -> Result<String, TraceError>;
}
