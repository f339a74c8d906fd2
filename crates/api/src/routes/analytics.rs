//! Usage analytics.

use std::sync::Arc;

use analytics::RouteCount;
use axum::Json;
use axum::extract::State;
use booking_store::BookingLedger;

use crate::error::ApiError;
use crate::state::AppState;

/// Number of routes reported by the top-routes endpoint.
pub const TOP_ROUTES_LIMIT: usize = 5;

/// GET /analytics/top-routes: the most searched (source, destination) pairs.
#[tracing::instrument(skip_all)]
pub async fn top_routes<S: BookingLedger + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<RouteCount>>, ApiError> {
    let routes = state.usage.top_routes(TOP_ROUTES_LIMIT).await?;
    Ok(Json(routes))
}
