//! Error types for upstream job-board fetches

use crate::error::AppError;

/// Result type for source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Errors that can occur while fetching one board
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Non-success status code
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not JSON or lacked a `jobs` array
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Client could not be built
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::InvalidResponse(err.to_string())
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Configuration(msg) => AppError::Configuration(msg),
            SourceError::Timeout(secs) => AppError::Timeout(format!("source fetch after {secs}s")),
            other => AppError::Network(other.to_string()),
        }
    }
}
