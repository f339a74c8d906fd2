//! API error types with HTTP response mapping.

use analytics::AnalyticsError;
use auth::AuthError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use booking_store::StoreError;
use queries::QueryError;
use reservation::ReservationError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad or missing input.
    InvalidRequest(String),
    /// Missing or invalid credentials.
    Unauthorized(String),
    /// Authenticated, but not allowed.
    Forbidden(String),
    TrainNotFound(String),
    InsufficientSeats(String),
    /// The train is locked by concurrent bookings; the client may retry.
    Busy(String),
    /// Internal server error.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) | ApiError::InsufficientSeats(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::TrainNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Busy(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::TrainNotFound(_) => "train_not_found",
            ApiError::InsufficientSeats(_) => "insufficient_seats",
            ApiError::Busy(_) => "busy",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                "Internal server error".to_string()
            }
            ApiError::InvalidRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::TrainNotFound(msg)
            | ApiError::InsufficientSeats(msg)
            | ApiError::Busy(msg) => msg,
        };

        let body = serde_json::json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

impl From<ReservationError> for ApiError {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::InvalidRequest(_) => ApiError::InvalidRequest(err.to_string()),
            ReservationError::TrainNotFound(_) => ApiError::TrainNotFound("Train not found".to_string()),
            ReservationError::InsufficientSeats { .. } => {
                ApiError::InsufficientSeats(err.to_string())
            }
            ReservationError::Busy(_) => ApiError::Busy(err.to_string()),
            ReservationError::Storage(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TrainNotFound(_) => ApiError::TrainNotFound("Train not found".to_string()),
            StoreError::DuplicateTrainNumber(_) => ApiError::InvalidRequest(err.to_string()),
            StoreError::LockTimeout(_) => ApiError::Busy(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Store(store_err) => store_err.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UsernameTaken(_) | AuthError::InvalidRegistration(_) => {
                ApiError::InvalidRequest(err.to_string())
            }
            AuthError::InvalidCredentials | AuthError::InvalidToken(_) => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::Token(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use common::TrainId;

    use super::*;

    #[test]
    fn reservation_errors_map_to_statuses() {
        let id = TrainId::new(1);
        let cases = [
            (
                ReservationError::InvalidRequest("x".to_string()),
                StatusCode::BAD_REQUEST,
                "invalid_request",
            ),
            (
                ReservationError::TrainNotFound(id),
                StatusCode::NOT_FOUND,
                "train_not_found",
            ),
            (
                ReservationError::InsufficientSeats {
                    requested: 6,
                    available: 4,
                },
                StatusCode::BAD_REQUEST,
                "insufficient_seats",
            ),
            (
                ReservationError::Busy(id),
                StatusCode::SERVICE_UNAVAILABLE,
                "busy",
            ),
        ];

        for (err, status, code) in cases {
            let api_err = ApiError::from(err);
            assert_eq!(api_err.status(), status);
            assert_eq!(api_err.code(), code);
        }
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::UsernameTaken("a".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn duplicate_train_number_is_a_bad_request() {
        let err = ApiError::from(StoreError::DuplicateTrainNumber("12951".to_string()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_hide_details() {
        let response =
            ApiError::Internal("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
