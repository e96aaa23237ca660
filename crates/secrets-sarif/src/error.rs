//! Error types for baseline conversion.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SarifError {
    /// Local file could not be read or written
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Baseline is not valid detect-secrets JSON
    #[error("Failed to parse baseline: {0}")]
    InvalidBaseline(#[source] serde_json::Error),

    /// SARIF log could not be serialized
    #[error("Failed to serialize SARIF: {0}")]
    Serialize(#[source] serde_json::Error),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with a non-success status
    #[error("GitHub API returned {status} for {path}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    /// The repository file does not exist or has no inline content
    #[error("No content for {path} in repository")]
    MissingContent { path: String },

    /// Repository file content is not valid base64
    #[error("Failed to decode base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded content is not UTF-8
    #[error("Content of {path} is not valid UTF-8")]
    NotUtf8 { path: String },

    /// `GITHUB_REPOSITORY` is not `owner/name`
    #[error("Invalid repository {value}. Expected: owner/name")]
    InvalidRepository { value: String },

    /// A repository operation was requested without a token or repository
    #[error("{0} is required for repository access")]
    MissingSetting(&'static str),

    /// Token cannot be used as a header value
    #[error("Invalid access token")]
    InvalidToken,
}
