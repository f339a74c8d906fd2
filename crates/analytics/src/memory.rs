use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{Result, RouteCount, UsageEvent, UsageLog};

/// In-memory usage log.
#[derive(Clone, Default)]
pub struct InMemoryUsageLog {
    events: Arc<RwLock<Vec<UsageEvent>>>,
}

impl InMemoryUsageLog {
    /// Creates a new empty usage log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recorded events.
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }

    /// Returns a copy of every recorded event, oldest first.
    pub async fn events(&self) -> Vec<UsageEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl UsageLog for InMemoryUsageLog {
    async fn record(&self, event: UsageEvent) -> Result<()> {
        tracing::debug!(endpoint = %event.endpoint, caller = %event.user_id, "usage event recorded");
        self.events.write().await.push(event);
        Ok(())
    }

    async fn top_routes(&self, limit: usize) -> Result<Vec<RouteCount>> {
        let events = self.events.read().await;

        // Grouped by label so every reported route appears exactly once.
        let mut counts: HashMap<String, u64> = HashMap::new();
        for event in events.iter() {
            *counts.entry(event.params.label()).or_default() += 1;
        }

        let mut routes: Vec<RouteCount> = counts
            .into_iter()
            .map(|(route, count)| RouteCount { route, count })
            .collect();
        routes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.route.cmp(&b.route)));
        routes.truncate(limit);

        Ok(routes)
    }
}
