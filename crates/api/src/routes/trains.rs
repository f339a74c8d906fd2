//! Train publishing, search and seat audit.

use std::sync::Arc;
use std::time::Instant;

use analytics::{Caller, RouteParams, UsageEvent};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use booking_store::{BookingLedger, NewTrain, Train};
use common::TrainId;
use queries::SeatAudit;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::{AuthUser, MaybeUser};
use crate::state::AppState;

/// Endpoint name recorded with every search event.
pub const SEARCH_ENDPOINT: &str = "/trains/search";

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub source: Option<String>,
    pub destination: Option<String>,
}

/// POST /trains: publish a train (administrators only).
#[tracing::instrument(skip_all)]
pub async fn create<S: BookingLedger + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    payload: Result<Json<NewTrain>, JsonRejection>,
) -> Result<(StatusCode, Json<Train>), ApiError> {
    let admin = user.require_admin()?;
    let Json(new_train) = payload?;
    validate_new_train(&new_train)?;

    let train = state.store.create_train(new_train).await?;
    tracing::info!(train_id = %train.id, train_number = %train.train_number, admin = %admin.username, "train published");

    Ok((StatusCode::CREATED, Json(train)))
}

/// GET /trains/search: case-insensitive substring search on source and
/// destination. Every call is recorded in the usage log.
#[tracing::instrument(skip(state, caller))]
pub async fn search<S: BookingLedger + 'static>(
    State(state): State<Arc<AppState<S>>>,
    MaybeUser(caller): MaybeUser,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Train>>, ApiError> {
    let Query(params) = params?;

    let started = Instant::now();
    let trains = state
        .queries
        .search_trains(params.source.as_deref(), params.destination.as_deref())
        .await?;
    let execution_time = started.elapsed().as_secs_f64();

    let event = UsageEvent::new(
        SEARCH_ENDPOINT,
        RouteParams::new(params.source, params.destination),
        Caller::from(caller.map(|identity| identity.user_id)),
        execution_time,
    );
    if let Err(err) = state.usage.record(event).await {
        tracing::warn!(error = %err, "failed to record search event");
    }

    Ok(Json(trains))
}

/// GET /trains/{id}/audit: reconcile seats against bookings (administrators only).
#[tracing::instrument(skip(state, user))]
pub async fn audit<S: BookingLedger + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<SeatAudit>, ApiError> {
    user.require_admin()?;
    let Path(id) = id?;

    let audit = state.queries.audit_train(TrainId::new(id)).await?;
    Ok(Json(audit))
}

fn validate_new_train(train: &NewTrain) -> Result<(), ApiError> {
    let required = [
        ("train_number", &train.train_number),
        ("name", &train.name),
        ("source", &train.source),
        ("destination", &train.destination),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(ApiError::InvalidRequest(format!("{field} must not be blank")));
    }
    if train.arrival_time < train.departure_time {
        return Err(ApiError::InvalidRequest(
            "arrival_time must not be before departure_time".to_string(),
        ));
    }
    Ok(())
}
