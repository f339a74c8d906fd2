//! Account registration and login.

use std::sync::Arc;

use auth::{Registration, TokenPair};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use booking_store::BookingLedger;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /register: create an account and return its first token pair.
#[tracing::instrument(skip_all)]
pub async fn register<S: BookingLedger + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<Registration>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenPair>), ApiError> {
    let Json(registration) = payload?;
    let tokens = state.auth.register(registration).await?;
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// POST /login: exchange credentials for a token pair.
#[tracing::instrument(skip_all)]
pub async fn login<S: BookingLedger + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenPair>, ApiError> {
    let Json(req) = payload?;
    let tokens = state.auth.login(&req.username, &req.password).await?;
    Ok(Json(tokens))
}
