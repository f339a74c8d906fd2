use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TrainId;

/// Details of a train to be published by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrain {
    /// Public train number, unique across the inventory.
    pub train_number: String,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    /// Seat capacity, fixed at creation.
    pub total_seats: u32,
}

/// A train record in the inventory.
///
/// `available_seats` always lies in `0..=total_seats` and only changes
/// through a committed reservation lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Train {
    pub id: TrainId,
    pub train_number: String,
    pub name: String,
    pub source: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub total_seats: u32,
    pub available_seats: u32,
}

impl Train {
    /// Builds a fresh record with every seat available.
    pub fn from_new(id: TrainId, new: NewTrain) -> Self {
        Self {
            id,
            train_number: new.train_number,
            name: new.name,
            source: new.source,
            destination: new.destination,
            departure_time: new.departure_time,
            arrival_time: new.arrival_time,
            total_seats: new.total_seats,
            available_seats: new.total_seats,
        }
    }

    /// Number of seats held by committed bookings.
    pub fn booked_seats(&self) -> u32 {
        self.total_seats - self.available_seats
    }
}
