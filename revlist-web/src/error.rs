//! Error types for revlist-web

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::product_view::ViewError;

/// A page load was abandoned before it finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Load cancelled")]
pub struct Cancelled;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Backing store unreachable or request abandoned (503)
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// A load task died before producing a result (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ViewError> for ApiError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::NotFound(id) => ApiError::NotFound(format!("Product {}", id)),
            ViewError::Store(msg) => ApiError::Unavailable(msg),
            ViewError::Cancelled(c) => ApiError::Unavailable(c.to_string()),
        }
    }
}

impl From<Cancelled> for ApiError {
    fn from(c: Cancelled) -> Self {
        ApiError::Unavailable(c.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Load task failed: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE", msg)
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

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
