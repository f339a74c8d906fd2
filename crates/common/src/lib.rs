//! Shared types for the train booking backend.

mod types;

pub use types::{BookingId, TrainId, UserId};
