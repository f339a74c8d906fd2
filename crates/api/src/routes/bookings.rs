//! Seat reservation and booking history.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use booking_store::{Booking, BookingLedger};
use common::TrainId;
use serde::Deserialize;

use crate::error::ApiError;
use crate::extract::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub train_id: i64,
    /// Missing counts are treated as zero and rejected by the engine.
    #[serde(default)]
    pub seats_booked: i64,
}

/// POST /bookings: reserve seats on a train for the caller.
#[tracing::instrument(skip(state, user, payload), fields(user_id = %user.0.user_id))]
pub async fn create<S: BookingLedger + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let Json(req) = payload?;

    let booking = state
        .reservations
        .reserve(user.0.user_id, TrainId::new(req.train_id), req.seats_booked)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /bookings/my: the caller's bookings, oldest first.
#[tracing::instrument(skip_all, fields(user_id = %user.0.user_id))]
pub async fn list_mine<S: BookingLedger + 'static>(
    State(state): State<Arc<AppState<S>>>,
    user: AuthUser,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let bookings = state.queries.bookings_for_user(user.0.user_id).await?;
    Ok(Json(bookings))
}
