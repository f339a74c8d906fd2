//! HTTP API server for the train booking backend.
//!
//! Exposes registration, train publishing and search, seat booking and
//! route analytics over REST, with structured logging (tracing) and
//! Prometheus metrics.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use std::sync::Arc;

use analytics::InMemoryUsageLog;
use auth::{InMemoryAuthService, TokenConfig};
use axum::Router;
use axum::routing::{get, post};
use booking_store::BookingLedger;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: BookingLedger + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/register", post(routes::auth::register::<S>))
        .route("/login", post(routes::auth::login::<S>))
        .route("/trains", post(routes::trains::create::<S>))
        .route("/trains/search", get(routes::trains::search::<S>))
        .route("/trains/{id}/audit", get(routes::trains::audit::<S>))
        .route("/bookings", post(routes::bookings::create::<S>))
        .route("/bookings/my", get(routes::bookings::list_mine::<S>))
        .route(
            "/analytics/top-routes",
            get(routes::analytics::top_routes::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Builds application state over `store` with in-memory auth and usage log,
/// seeding the configured administrator.
pub async fn create_default_state<S: BookingLedger + Clone + 'static>(
    store: S,
    config: &Config,
) -> Result<Arc<AppState<S>>, auth::AuthError> {
    let tokens = TokenConfig::new(config.jwt_secret.clone()).with_access_ttl(
        chrono::Duration::from_std(config.access_token_ttl)
            .unwrap_or_else(|_| chrono::Duration::hours(1)),
    );
    let auth = InMemoryAuthService::new(tokens);
    if let Some(admin) = &config.admin {
        auth.seed_admin(&admin.username, &admin.password).await?;
    }

    Ok(Arc::new(AppState::new(
        store,
        Arc::new(auth),
        Arc::new(InMemoryUsageLog::new()),
        config.reservation_lock_wait,
    )))
}
