use thiserror::Error;

/// Errors that can occur when writing to or querying the usage log.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// The log backend is unavailable.
    #[error("Usage log unavailable: {0}")]
    Unavailable(String),
}

/// Result type for usage log operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
