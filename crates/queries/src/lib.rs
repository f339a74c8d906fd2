//! Read side of the booking backend.
//!
//! - [`QueryService`] for train search and a user's bookings
//! - [`SeatAudit`] reconciling a train's seat count against its ledger

pub mod audit;
pub mod error;
pub mod service;

pub use audit::SeatAudit;
pub use error::{QueryError, Result};
pub use service::QueryService;
