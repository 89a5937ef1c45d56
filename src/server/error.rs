use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::db::RepoError;
use crate::generate::{GenerateError, PromptError};

/// Error response body
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// A handler failure rendered as `{"error", "message"}` JSON.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    pub fn sync_disabled() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "sync_disabled",
            "Hevy sync is not configured (HEVY_TOKEN is not set)",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.error,
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        tracing::error!("Repository error: {}", e);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "database_error", e.to_string())
    }
}

impl From<GenerateError> for ApiError {
    fn from(e: GenerateError) -> Self {
        match e {
            GenerateError::MissingApiKey => {
                Self::new(StatusCode::BAD_REQUEST, "missing_api_key", e.to_string())
            }
            GenerateError::InvalidRequest(_) => Self::bad_request(e.to_string()),
            other => {
                tracing::error!("Workout generation failed: {}", other);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "generation_failed",
                    other.to_string(),
                )
            }
        }
    }
}

impl From<PromptError> for ApiError {
    fn from(e: PromptError) -> Self {
        tracing::error!("Prompt library error: {}", e);
        Self::internal(format!("Failed to save prompt: {}", e))
    }
}
