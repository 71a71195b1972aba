//! HTTP-facing error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::domain::AuthError;
use crate::infrastructure::dto::http::ErrorBody;

/// Errors surfaced as structured HTTP responses.
///
/// Real-time-facing errors never come through here; they are absorbed by
/// the gateway (auth, persistence) or abort the single streaming request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable credentials were supplied
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials or PIN were supplied but rejected
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Unknown room, non-local room, or missing file
    #[error("not found: {0}")]
    NotFound(String),

    /// Filesystem or store failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ApiError::Unauthorized(err.to_string()),
            _ => ApiError::Forbidden(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
