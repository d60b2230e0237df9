//! Error types for Slack operations

use thiserror::Error;

/// Result type for Slack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while posting to Slack
#[derive(Error, Debug)]
pub enum Error {
    /// Slack answered `ok: false`
    #[error("Slack chat.postMessage failed: {error}")]
    Delivery { error: String },

    /// The request could not be sent or its response not read
    #[error("Slack request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response was not the JSON envelope Slack documents
    #[error("Unexpected Slack response (HTTP {status}): {body}")]
    Parse { status: u16, body: String },

    /// Authentication error
    #[error("Slack authentication error: {0}")]
    Auth(String),
}

impl From<Error> for reminder_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Delivery { error } => reminder_core::Error::Delivery { error },
            Error::Request(e) => reminder_core::Error::Http(e.to_string()),
            Error::Parse { status, body } => reminder_core::Error::Http(format!(
                "Unexpected Slack response (HTTP {}): {}",
                status, body
            )),
            Error::Auth(msg) => reminder_core::Error::Config(msg),
        }
    }
}
