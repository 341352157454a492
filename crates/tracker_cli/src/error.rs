//! Custom error types for the command-line front end.

use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("record error: {0}")]
    Tracker(#[from] tracker_core::TrackerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
