//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use analytics::UsageLog;
use auth::AuthService;
use booking_store::BookingLedger;
use queries::QueryService;
use reservation::ReservationEngine;

/// Shared application state accessible from all handlers.
pub struct AppState<S: BookingLedger> {
    pub store: S,
    pub reservations: ReservationEngine<S>,
    pub queries: QueryService<S>,
    pub auth: Arc<dyn AuthService>,
    pub usage: Arc<dyn UsageLog>,
}

impl<S: BookingLedger + Clone> AppState<S> {
    /// Wires the reservation engine and query service over one store.
    pub fn new(
        store: S,
        auth: Arc<dyn AuthService>,
        usage: Arc<dyn UsageLog>,
        lock_wait: Duration,
    ) -> Self {
        Self {
            reservations: ReservationEngine::new(store.clone()).with_lock_wait(lock_wait),
            queries: QueryService::new(store.clone()),
            store,
            auth,
            usage,
        }
    }
}
