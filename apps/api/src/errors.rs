use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::resumes::extractors::ExtractError;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Another download holds the single-flight lease.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("LLM error: {message}")]
    Llm {
        message: String,
        #[source]
        source: Option<LlmError>,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<StorageError>,
    },

    /// Download failed after the lease was taken: bad file name or local write.
    #[error("Download error: {0}")]
    Download(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn llm(message: impl Into<String>, source: LlmError) -> Self {
        AppError::Llm {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn storage(message: impl Into<String>, source: StorageError) -> Self {
        AppError::Storage {
            message: message.into(),
            source: Some(source),
        }
    }
}

/// Malformed, mistyped or non-JSON request bodies are client errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// `Json` extractor whose rejections use the `AppError` body shape.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, "DOWNLOAD_IN_PROGRESS", msg.clone())
            }
            AppError::Llm { message, source } => {
                match source {
                    Some(e) => tracing::error!("LLM error: {message}: {e}"),
                    None => tracing::error!("LLM error: {message}"),
                }
                (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR", message.clone())
            }
            AppError::Storage { message, source } => {
                match source {
                    Some(e) => tracing::error!("Storage error: {message}: {e}"),
                    None => tracing::error!("Storage error: {message}"),
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    message.clone(),
                )
            }
            AppError::Download(msg) => {
                tracing::error!("Download error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DOWNLOAD_ERROR",
                    msg.clone(),
                )
            }
            AppError::Extraction(e) => {
                tracing::error!("Extraction error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXTRACTION_ERROR",
                    "Internal server error during parsing".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_is_client_error() {
        let response = AppError::Conflict("busy".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_llm_error_is_server_error() {
        let response = AppError::llm("failed", LlmError::EmptyContent).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
