//! Reservation error types.

use booking_store::StoreError;
use common::TrainId;
use thiserror::Error;

/// Errors that can occur while reserving seats.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// The request itself is malformed, e.g. a non-positive seat count.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The train does not exist.
    #[error("Train not found: {0}")]
    TrainNotFound(TrainId),

    /// The train has fewer seats left than requested.
    #[error("No seats available: requested {requested}, available {available}")]
    InsufficientSeats { requested: u32, available: u32 },

    /// Exclusive access to the train could not be acquired in time.
    /// The caller may retry.
    #[error("Train {0} is busy, try again")]
    Busy(TrainId),

    /// The underlying store failed.
    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl ReservationError {
    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReservationError::Busy(_))
    }

    /// Stable label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ReservationError::InvalidRequest(_) => "invalid_request",
            ReservationError::TrainNotFound(_) => "train_not_found",
            ReservationError::InsufficientSeats { .. } => "insufficient_seats",
            ReservationError::Busy(_) => "busy",
            ReservationError::Storage(_) => "storage_error",
        }
    }
}

impl From<StoreError> for ReservationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TrainNotFound(id) => ReservationError::TrainNotFound(id),
            StoreError::LockTimeout(id) => ReservationError::Busy(id),
            other => ReservationError::Storage(other),
        }
    }
}

/// Convenience type alias for reservation results.
pub type Result<T> = std::result::Result<T, ReservationError>;
