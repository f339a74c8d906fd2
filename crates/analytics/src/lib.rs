//! Usage logging and analytics.
//!
//! Searches are recorded as [`UsageEvent`]s in an append-only [`UsageLog`];
//! the log groups them by route to answer "most searched routes".

pub mod error;
pub mod event;
pub mod log;
pub mod memory;

pub use error::{AnalyticsError, Result};
pub use event::{Caller, RouteCount, RouteParams, UsageEvent};
pub use log::UsageLog;
pub use memory::InMemoryUsageLog;
