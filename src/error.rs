//! Error types for the response cache server
//!
//! The cache itself is total; these errors come from request validation and
//! from the assistant backend, and are surfaced to the HTTP caller unchanged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::assistant::AssistantError;

// == App Error Enum ==
/// Unified error type for the HTTP layer.
#[derive(Error, Debug)]
pub enum AppError {
    /// Key not present or expired
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The assistant backend failed
    #[error(transparent)]
    Assistant(#[from] AssistantError),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Assistant(AssistantError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Assistant(AssistantError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            AppError::Assistant(AssistantError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Assistant(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retryable = match &self {
            AppError::Assistant(err) => err.retryable(),
            _ => false,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "retryable": retryable,
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP layer.
pub type Result<T> = std::result::Result<T, AppError>;
