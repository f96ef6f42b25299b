//! Error types for the laggard workspace.
//!
//! Undefined indicator values are never errors; they are carried as
//! `Option::None` through the pipeline. The variants below cover the failures
//! that must stop a run: bad input data, a missing roster and I/O problems.

use thiserror::Error;

/// The main error type for laggard operations.
#[derive(Debug, Error)]
pub enum LaggardError {
    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when data is insufficient for the requested operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Error when a date or month key is out of range or invalid.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The membership roster is missing or unusable.
    ///
    /// Without a roster the point-in-time universe cannot be honoured, so this
    /// is always fatal for a backtest.
    #[error("Roster unavailable: {0}")]
    Roster(String),

    /// Error in a run configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for LaggardError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for LaggardError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for laggard operations.
pub type Result<T> = std::result::Result<T, LaggardError>;
