//! Unified error handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use botgame_engine::Error as EngineError;
use serde::Serialize;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid request: {0}")]
    #[allow(dead_code)]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Engine(e) => engine_error_response(e),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

/// Map engine error kinds onto HTTP statuses.
///
/// Validation failures are the caller's fault, absence of the referenced
/// user is 404, and everything store-shaped stays an opaque server error
/// with the cause already logged at the store boundary.
fn engine_error_response(e: &EngineError) -> (StatusCode, String) {
    match e {
        EngineError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        EngineError::UserNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        EngineError::Timeout => (StatusCode::GATEWAY_TIMEOUT, e.to_string()),
        EngineError::IdSpaceExhausted { .. } => {
            tracing::warn!("Allocation exhausted: {:?}", e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
        }
        EngineError::DuplicateId(_) | EngineError::Unavailable(_) => {
            tracing::error!("Store error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;
