//! Query error types.

use thiserror::Error;

/// Errors that can occur while serving read queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// An error occurred in the booking store.
    #[error("Store error: {0}")]
    Store(#[from] booking_store::StoreError),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
