//! Error types for mkmeet.

use thiserror::Error;

/// Errors that can occur while authorizing or creating events.
#[derive(Error, Debug)]
pub enum MkMeetError {
    #[error("Authorization error: {0}")]
    Auth(String),

    #[error("Calendar API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed calendar API response: {0}")]
    MalformedResponse(String),

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MkMeetError {
    fn from(err: serde_json::Error) -> Self {
        MkMeetError::Serialization(err.to_string())
    }
}

/// Result type alias for mkmeet operations.
pub type MkMeetResult<T> = Result<T, MkMeetError>;
