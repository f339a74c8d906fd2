use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BookingId, TrainId, UserId};

/// A booking about to be written to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewBooking {
    pub user_id: UserId,
    pub train_id: TrainId,
    pub seats_booked: u32,
}

impl NewBooking {
    pub fn new(user_id: UserId, train_id: TrainId, seats_booked: u32) -> Self {
        Self {
            user_id,
            train_id,
            seats_booked,
        }
    }
}

/// A confirmed, immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub train_id: TrainId,
    pub seats_booked: u32,
    pub booking_date: DateTime<Utc>,
}
