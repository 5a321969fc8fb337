//! Error types for the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orchestrator::AssistantError;
use thiserror::Error;

/// Errors returned by the route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Assistant(#[from] AssistantError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Assistant(AssistantError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Assistant(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let ApiError::Assistant(err) = &self;

        match err {
            AssistantError::Validation(msg) => tracing::debug!("Rejected request: {}", msg),
            other => tracing::error!("Request failed: {}", other),
        }

        let body = serde_json::json!({
            "error": err.user_message()
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for route handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
