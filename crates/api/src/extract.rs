//! Bearer-token extractors.

use std::sync::Arc;

use auth::Identity;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use booking_store::BookingLedger;

use crate::error::ApiError;
use crate::state::AppState;

/// An authenticated caller. Rejects the request with 401 otherwise.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    /// Fails with 403 unless the caller is an administrator.
    pub fn require_admin(&self) -> Result<&Identity, ApiError> {
        if self.0.is_admin {
            Ok(&self.0)
        } else {
            Err(ApiError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ))
        }
    }
}

/// The caller if a bearer token was sent, `None` for anonymous requests.
///
/// A token that is present but invalid still rejects the request.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Identity>);

impl<S> FromRequestParts<Arc<AppState<S>>> for AuthUser
where
    S: BookingLedger + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| {
            ApiError::Unauthorized("Authentication credentials were not provided".to_string())
        })?;
        let identity = state.auth.validate(token).await?;
        Ok(AuthUser(identity))
    }
}

impl<S> FromRequestParts<Arc<AppState<S>>> for MaybeUser
where
    S: BookingLedger + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState<S>>,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(MaybeUser(Some(state.auth.validate(token).await?))),
            None => Ok(MaybeUser(None)),
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Malformed Authorization header".to_string()))?;
    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(Some(token.trim()))
        }
        _ => Err(ApiError::Unauthorized(
            "Authorization header must be 'Bearer <token>'".to_string(),
        )),
    }
}
