//! Error types for runner plumbing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while talking to the Actions runner environment.
#[derive(Debug, Error)]
pub enum ActionError {
    /// A runner-provided file could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The event payload is not valid JSON
    #[error("Failed to parse event payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The tracing subscriber could not be installed
    #[error("Failed to initialize tracing: {0}")]
    Telemetry(String),
}
