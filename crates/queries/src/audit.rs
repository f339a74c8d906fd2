//! Seat reconciliation for a single train.

use booking_store::TrainSnapshot;
use common::TrainId;
use serde::Serialize;

/// Result of checking `available + booked == total` for one train.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatAudit {
    pub train_id: TrainId,
    pub total_seats: u32,
    pub available_seats: u32,
    /// Sum of `seats_booked` over the train's ledger entries.
    pub seats_booked: u64,
    pub booking_count: usize,
    pub consistent: bool,
}

impl SeatAudit {
    /// Reconciles a snapshot of a train and its bookings.
    pub fn from_snapshot(snapshot: &TrainSnapshot) -> Self {
        let train = &snapshot.train;
        let seats_booked: u64 = snapshot
            .bookings
            .iter()
            .map(|b| u64::from(b.seats_booked))
            .sum();

        Self {
            train_id: train.id,
            total_seats: train.total_seats,
            available_seats: train.available_seats,
            seats_booked,
            booking_count: snapshot.bookings.len(),
            consistent: u64::from(train.available_seats) + seats_booked
                == u64::from(train.total_seats),
        }
    }
}
