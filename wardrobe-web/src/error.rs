//! Error types for wardrobe-web
//!
//! Handler errors become `{"error": {"code", "message"}}` bodies. Upstream
//! failures that must not fail a user action (analytics writes, single
//! outfit writes) are logged at the call site and never reach this type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Missing or unknown bearer token (401); clients return to the entry page
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Closet is full (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Feature exists in the UI but is not available yet (501)
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// wardrobe-common error
    #[error("{0}")]
    Common(#[from] wardrobe_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Unauthorized(msg) => {
                let body = Json(json!({
                    "error": { "code": "UNAUTHORIZED", "message": msg },
                    "redirect": "/",
                }));
                return (StatusCode::UNAUTHORIZED, body).into_response();
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::NotImplemented(msg) => {
                (StatusCode::NOT_IMPLEMENTED, "NOT_IMPLEMENTED", msg)
            }
            ApiError::Database(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                err.to_string(),
            ),
            ApiError::Common(err) => match err {
                wardrobe_common::Error::InvalidInput(msg) => {
                    (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg)
                }
                wardrobe_common::Error::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMMON_ERROR",
                    other.to_string(),
                ),
            },
        };

        if status.is_server_error() {
            tracing::error!(code = error_code, "{}", message);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
