use async_trait::async_trait;

use crate::{Result, RouteCount, UsageEvent};

/// Append-only store of usage events with grouped counting.
#[async_trait]
pub trait UsageLog: Send + Sync {
    /// Appends an event.
    async fn record(&self, event: UsageEvent) -> Result<()>;

    /// Groups events by (source, destination) and returns the `limit` most
    /// frequent routes, by count descending. Equal counts are ordered by route
    /// label so the result is stable.
    async fn top_routes(&self, limit: usize) -> Result<Vec<RouteCount>>;
}
