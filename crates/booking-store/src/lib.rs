//! Durable train inventory and booking ledger.
//!
//! The [`InventoryStore`] hands out exclusive, per-train leases; the
//! [`BookingLedger`] stages entries on a lease so that the seat decrement and
//! the ledger entry become visible together when the lease commits.

pub mod booking;
pub mod error;
pub mod filter;
pub mod memory;
pub mod postgres;
pub mod store;
pub mod train;

pub use booking::{Booking, NewBooking};
pub use common::{BookingId, TrainId, UserId};
pub use error::{Result, StoreError};
pub use filter::TrainFilter;
pub use memory::{InMemoryBookingStore, InMemoryLease};
pub use postgres::{PgLease, PostgresBookingStore};
pub use store::{
    BookingLedger, ExclusiveLease, InventoryStore, TrainSnapshot, validate_append, validate_commit,
};
pub use train::{NewTrain, Train};
