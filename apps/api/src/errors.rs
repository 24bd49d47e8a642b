use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// One failing field in a write request, e.g. `workExperience[0].company`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    ValidationFailed(Vec<FieldError>),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) | AppError::ValidationFailed(_) => "VALIDATION_ERROR",
            AppError::GenerationFailed(_) => "GENERATION_FAILED",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) | StoreError::VersionNotFound { .. } => {
                AppError::NotFound(e.to_string())
            }
            StoreError::Unavailable(msg) => AppError::StoreUnavailable(msg),
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Corrupt { .. } => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::ValidationFailed(fields) => (
                StatusCode::BAD_REQUEST,
                self.to_string(),
                Some(json!(fields)),
            ),
            AppError::GenerationFailed(msg) => {
                tracing::error!("Generation failed: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None)
            }
            AppError::StoreUnavailable(msg) => {
                tracing::error!("Store unavailable: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The resume store is unavailable".to_string(),
                    None,
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
