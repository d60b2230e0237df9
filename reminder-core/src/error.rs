//! Error types for pr-reminder

use thiserror::Error;

/// Result type alias for reminder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for reminder operations
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration is absent or malformed
    #[error("Configuration error: {0}")]
    Config(String),

    /// The hosting API answered with a non-success status
    #[error("GitHub API error {status}: {body}")]
    Transport {
        /// HTTP status code
        status: u16,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// The messaging API reported a structured failure
    #[error("Slack chat.postMessage failed: {error}")]
    Delivery {
        /// Error code reported by the messaging API
        error: String,
    },

    /// The request never produced a response (connect, TLS, decode)
    #[error("HTTP error: {0}")]
    Http(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error happened before any network call was attempted
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
