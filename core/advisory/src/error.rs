//! Advisory error types.
//!
//! These never reach callers of [`crate::AdvisoryClient::request_opinion`];
//! they are logged and replaced by a fallback opinion.

use thiserror::Error;

/// Errors from a single advisory exchange.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// Request could not be sent or the connection failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Service answered with a non-success status.
    #[error("Service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Reply carried no text.
    #[error("Empty reply from advisory service")]
    EmptyReply,

    /// Reply text was not a valid opinion.
    #[error("Malformed reply: {0}")]
    MalformedReply(String),

    /// Client configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AdvisoryError {
    /// Get error code for logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            AdvisoryError::Transport(_) => "TRANSPORT_ERROR",
            AdvisoryError::Status { .. } => "BAD_STATUS",
            AdvisoryError::EmptyReply => "EMPTY_REPLY",
            AdvisoryError::MalformedReply(_) => "MALFORMED_REPLY",
            AdvisoryError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<reqwest::Error> for AdvisoryError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => AdvisoryError::Status {
                status: status.as_u16(),
                body: e.to_string(),
            },
            None => AdvisoryError::Transport(e.to_string()),
        }
    }
}

/// Result type for advisory operations.
pub type AdvisoryResult<T> = Result<T, AdvisoryError>;
