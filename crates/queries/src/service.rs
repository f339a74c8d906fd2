//! Read-only queries over the inventory and the ledger.

use booking_store::{Booking, BookingLedger, Train, TrainFilter};
use common::{TrainId, UserId};

use crate::audit::SeatAudit;
use crate::error::Result;

/// Read-only search and listing over committed state.
///
/// Never takes a lease, so queries never wait on in-flight reservations and
/// never observe them before they commit.
#[derive(Debug, Clone)]
pub struct QueryService<S: BookingLedger> {
    store: S,
}

impl<S: BookingLedger> QueryService<S> {
    /// Creates a query service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Finds trains whose source and destination contain the given
    /// substrings, ignoring case. A missing parameter matches every train.
    #[tracing::instrument(skip(self))]
    pub async fn search_trains(
        &self,
        source: Option<&str>,
        destination: Option<&str>,
    ) -> Result<Vec<Train>> {
        let mut filter = TrainFilter::new();
        if let Some(source) = source {
            filter = filter.source(source);
        }
        if let Some(destination) = destination {
            filter = filter.destination(destination);
        }
        Ok(self.store.find_trains(filter).await?)
    }

    /// Lists the committed bookings of a user.
    #[tracing::instrument(skip(self))]
    pub async fn bookings_for_user(&self, user_id: UserId) -> Result<Vec<Booking>> {
        Ok(self.store.list_by_user(user_id).await?)
    }

    /// Reconciles a train's available seats against its ledger.
    #[tracing::instrument(skip(self))]
    pub async fn audit_train(&self, train_id: TrainId) -> Result<SeatAudit> {
        let snapshot = self.store.snapshot(train_id).await?;
        let audit = SeatAudit::from_snapshot(&snapshot);
        if !audit.consistent {
            tracing::error!(
                %train_id,
                available = audit.available_seats,
                booked = audit.seats_booked,
                total = audit.total_seats,
                "seat ledger out of balance"
            );
        }
        Ok(audit)
    }
}
