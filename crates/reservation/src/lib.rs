//! Seat reservation for the train booking backend.
//!
//! [`ReservationEngine::reserve`] is the only way seats leave a train: it
//! takes an exclusive lease on the train, checks capacity, stages the booking
//! and commits the decremented seat count with it, so no reader ever sees one
//! without the other. Reservations on different trains run in parallel.

pub mod engine;
pub mod error;

pub use engine::{DEFAULT_LOCK_WAIT, ReservationEngine};
pub use error::{ReservationError, Result};
