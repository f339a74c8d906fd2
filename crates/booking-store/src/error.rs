use thiserror::Error;

use crate::TrainId;

/// Errors that can occur when interacting with the booking store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No train exists with the given ID.
    #[error("Train not found: {0}")]
    TrainNotFound(TrainId),

    /// Another train already uses this train number.
    #[error("Train number already exists: {0}")]
    DuplicateTrainNumber(String),

    /// Exclusive access to the train could not be acquired in time.
    #[error("Timed out waiting for exclusive access to train {0}")]
    LockTimeout(TrainId),

    /// A ledger entry was staged on a lease held for a different train.
    #[error("Lease is held for train {leased}, not train {requested}")]
    LeaseMismatch { leased: TrainId, requested: TrainId },

    /// A commit or append would break the seat accounting of the train.
    #[error("Invalid commit: {0}")]
    InvalidCommit(String),

    /// A stored row could not be mapped back into a domain value.
    #[error("Corrupted record: {0}")]
    Corrupted(String),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for booking store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
