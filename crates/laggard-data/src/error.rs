//! Error types for data acquisition and loading.

use laggard_traits::LaggardError;
use thiserror::Error;

/// Errors that can occur when fetching, caching or loading input data.
#[derive(Debug, Error)]
pub enum DataError {
    /// Missing API key.
    #[error("FMP_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// API returned an error.
    #[error("FMP API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// No data available.
    #[error("No data available for {0}")]
    NoData(String),

    /// The roster file is missing or malformed.
    #[error("Roster unavailable: {0}")]
    Roster(String),

    /// A value could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<DataError> for LaggardError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Roster(msg) => Self::Roster(msg),
            DataError::Io(e) => Self::Io(e),
            DataError::Parse(msg) => Self::InvalidData(msg),
            other => Self::Other(other.to_string()),
        }
    }
}
