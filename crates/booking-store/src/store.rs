use std::time::Duration;

use async_trait::async_trait;

use crate::{Booking, NewBooking, NewTrain, Result, StoreError, Train, TrainFilter, TrainId, UserId};

/// Exclusive access to one train record, held between
/// [`InventoryStore::acquire_exclusive`] and [`InventoryStore::commit`].
///
/// Dropping a lease without committing releases it and discards every
/// ledger entry staged on it.
pub trait ExclusiveLease: Send {
    /// The train as read while holding exclusive access.
    fn train(&self) -> &Train;

    /// Total seats of the ledger entries staged on this lease.
    fn staged_seats(&self) -> u32;
}

/// A train together with its committed bookings, read from one snapshot.
#[derive(Debug, Clone)]
pub struct TrainSnapshot {
    pub train: Train,
    pub bookings: Vec<Booking>,
}

/// Durable holder of train seat-capacity records.
///
/// Implementations must be thread-safe. Leases on the same train serialize;
/// leases on different trains never wait for each other.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// The scoped exclusive-access handle for this backend.
    type Lease: ExclusiveLease;

    /// Publishes a new train with every seat available.
    ///
    /// Fails with `DuplicateTrainNumber` if the train number is taken.
    async fn create_train(&self, train: NewTrain) -> Result<Train>;

    /// Reads the committed state of a train.
    async fn get(&self, train_id: TrainId) -> Result<Train>;

    /// Lists committed trains matching the filter, ordered by ID.
    async fn find_trains(&self, filter: TrainFilter) -> Result<Vec<Train>>;

    /// Acquires sole access to a train's seat count.
    ///
    /// Waits at most `wait` for a concurrent holder to release; fails with
    /// `LockTimeout` after that and with `TrainNotFound` if the train does
    /// not exist.
    async fn acquire_exclusive(&self, train_id: TrainId, wait: Duration) -> Result<Self::Lease>;

    /// Persists `new_available` and every ledger entry staged on the lease
    /// as one atomic write, then releases the lease.
    ///
    /// Nothing is applied if [`validate_commit`] rejects the lease.
    async fn commit(&self, lease: Self::Lease, new_available: u32) -> Result<Train>;
}

/// Append-only store of confirmed bookings.
#[async_trait]
pub trait BookingLedger: InventoryStore {
    /// Assigns an identifier and timestamp to the entry and stages it on the
    /// lease. The entry becomes durable and visible when the lease commits.
    async fn append(&self, lease: &mut Self::Lease, entry: NewBooking) -> Result<Booking>;

    /// Committed bookings of a user, ordered by booking ID.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Booking>>;

    /// Committed bookings of a train, ordered by booking ID.
    async fn list_by_train(&self, train_id: TrainId) -> Result<Vec<Booking>>;

    /// Reads a train and its bookings from the same committed state.
    async fn snapshot(&self, train_id: TrainId) -> Result<TrainSnapshot>;
}

/// Checks that a ledger entry may be staged on a lease.
pub fn validate_append(lease: &impl ExclusiveLease, entry: &NewBooking) -> Result<()> {
    let train = lease.train();
    if entry.train_id != train.id {
        return Err(StoreError::LeaseMismatch {
            leased: train.id,
            requested: entry.train_id,
        });
    }
    if entry.seats_booked == 0 {
        return Err(StoreError::InvalidCommit(
            "Cannot book zero seats".to_string(),
        ));
    }

    let staged = lease.staged_seats().saturating_add(entry.seats_booked);
    if staged > train.available_seats {
        return Err(StoreError::InvalidCommit(format!(
            "Staged {staged} seats on train {} with only {} available",
            train.id, train.available_seats
        )));
    }

    Ok(())
}

/// Checks that committing `new_available` keeps the seat invariant:
/// the seats removed from the train equal the seats staged in the ledger.
pub fn validate_commit(train: &Train, staged_seats: u32, new_available: u32) -> Result<()> {
    if new_available > train.total_seats {
        return Err(StoreError::InvalidCommit(format!(
            "Available seats {new_available} exceed capacity {} of train {}",
            train.total_seats, train.id
        )));
    }

    if train.available_seats.checked_sub(staged_seats) != Some(new_available) {
        return Err(StoreError::InvalidCommit(format!(
            "Train {} moving from {} to {new_available} available seats does not match {staged_seats} staged seats",
            train.id, train.available_seats
        )));
    }

    Ok(())
}
