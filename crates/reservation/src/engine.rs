//! The reservation protocol: lease, check, stage, commit.

use std::time::{Duration, Instant};

use booking_store::{Booking, BookingLedger, ExclusiveLease, NewBooking};
use common::{TrainId, UserId};

use crate::error::{ReservationError, Result};

/// How long a reservation waits for a contended train by default.
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(2);

/// Turns booking requests into a seat decrement plus ledger entry, atomically.
///
/// The engine holds no state of its own beyond the store handle; all
/// serialization happens in the store's per-train leases.
#[derive(Debug, Clone)]
pub struct ReservationEngine<S: BookingLedger> {
    store: S,
    lock_wait: Duration,
}

impl<S: BookingLedger> ReservationEngine<S> {
    /// Creates an engine using [`DEFAULT_LOCK_WAIT`].
    pub fn new(store: S) -> Self {
        Self {
            store,
            lock_wait: DEFAULT_LOCK_WAIT,
        }
    }

    /// Sets the bound on how long a reservation waits for a contended train.
    pub fn with_lock_wait(mut self, lock_wait: Duration) -> Self {
        self.lock_wait = lock_wait;
        self
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn lock_wait(&self) -> Duration {
        self.lock_wait
    }

    /// Reserves `seats_requested` seats on a train for a user.
    ///
    /// Fails with `InvalidRequest` for a non-positive count, `TrainNotFound`,
    /// `InsufficientSeats` when fewer seats remain (an exact match succeeds),
    /// or `Busy` when the train stays locked past the configured wait. A
    /// failed reservation leaves no trace in the store.
    #[tracing::instrument(skip(self))]
    pub async fn reserve(
        &self,
        user_id: UserId,
        train_id: TrainId,
        seats_requested: i64,
    ) -> Result<Booking> {
        let started = Instant::now();
        let result = self.try_reserve(user_id, train_id, seats_requested).await;

        let outcome = match &result {
            Ok(booking) => {
                tracing::info!(booking_id = %booking.id, "reservation confirmed");
                "confirmed"
            }
            Err(err) if err.is_retryable() => {
                tracing::warn!(error = %err, "reservation contended");
                err.outcome()
            }
            Err(err) => {
                tracing::debug!(error = %err, "reservation rejected");
                err.outcome()
            }
        };
        metrics::counter!("reservations_total", "outcome" => outcome).increment(1);
        metrics::histogram!("reservation_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        result
    }

    async fn try_reserve(
        &self,
        user_id: UserId,
        train_id: TrainId,
        seats_requested: i64,
    ) -> Result<Booking> {
        let seats = seat_count(seats_requested)?;

        let mut lease = self
            .store
            .acquire_exclusive(train_id, self.lock_wait)
            .await?;

        let available = lease.train().available_seats;
        if available < seats {
            // Dropping the lease releases the train untouched.
            return Err(ReservationError::InsufficientSeats {
                requested: seats,
                available,
            });
        }

        let booking = self
            .store
            .append(&mut lease, NewBooking::new(user_id, train_id, seats))
            .await?;
        self.store.commit(lease, available - seats).await?;

        Ok(booking)
    }
}

fn seat_count(seats_requested: i64) -> Result<u32> {
    if seats_requested <= 0 {
        return Err(ReservationError::InvalidRequest(format!(
            "seats_booked must be a positive integer, got {seats_requested}"
        )));
    }
    u32::try_from(seats_requested).map_err(|_| {
        ReservationError::InvalidRequest(format!(
            "seats_booked {seats_requested} is out of range"
        ))
    })
}
