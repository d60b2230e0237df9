//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// Non-success HTTP status, with the raw body for diagnostics
    #[error("GitHub API error {status}: {body}")]
    Transport { status: u16, body: String },

    /// The request could not be sent or its response not read
    #[error("GitHub request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),
}

impl From<Error> for reminder_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Transport { status, body } => reminder_core::Error::Transport { status, body },
            Error::Request(e) => reminder_core::Error::Http(e.to_string()),
            Error::Auth(msg) => reminder_core::Error::Config(msg),
        }
    }
}
