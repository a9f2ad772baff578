//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Bad request")]
    BadRequest,

    #[error("Not found")]
    NotFound,

    #[error("Expired")]
    Expired,

    #[error("Already picked")]
    AlreadyPicked,

    #[error("No more chunks")]
    NoMoreChunks,

    #[error("Missing required header: {0}")]
    MissingHeader(String),

    // Transient errors (retryable)
    #[error("Sprinkle is busy, retry later")]
    LockBusy,

    // Server errors (5xx)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether retrying the same call may succeed without any state change.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy)
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidParameter(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_parameter", Some(msg.clone()))
            }
            AppError::BadRequest => (StatusCode::BAD_REQUEST, "bad_request", None),
            AppError::Expired => (StatusCode::BAD_REQUEST, "expired", None),
            AppError::AlreadyPicked => (StatusCode::BAD_REQUEST, "already_picked", None),
            AppError::MissingHeader(header) => {
                (StatusCode::BAD_REQUEST, "missing_header", Some(header.clone()))
            }

            // 404 Not Found
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", None),
            AppError::NoMoreChunks => (StatusCode::NOT_FOUND, "no_more_chunks", None),

            // 503 Service Unavailable (retryable)
            AppError::LockBusy => {
                (StatusCode::SERVICE_UNAVAILABLE, "lock_busy", None)
            }

            // 500 Internal Server Error
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
