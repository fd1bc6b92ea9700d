//! Workspace-level error types for Railwise.

use thiserror::Error;

/// Errors shared by every Railwise crate.
#[derive(Error, Debug)]
pub enum RailwiseError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An amount could not be parsed or is out of the accepted range.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl RailwiseError {
    /// Get error code for logs and CLI output.
    pub fn error_code(&self) -> &'static str {
        match self {
            RailwiseError::ConfigurationError(_) => "CONFIGURATION_ERROR",
            RailwiseError::InvalidAmount(_) => "INVALID_AMOUNT",
        }
    }
}

/// Result type alias for Railwise operations.
pub type Result<T> = std::result::Result<T, RailwiseError>;
