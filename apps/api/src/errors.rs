use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::supabase::SupabaseError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Response bodies keep the flat `{"error": ...}` shape the frontend expects,
/// except `NotFound`, which renders under a `"message"` key.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    /// A failed insert or select. `message` is the route-specific string shown
    /// to the client; the upstream error is logged and only exposed in the
    /// body when `expose_detail` is set.
    #[error("{message}")]
    Database {
        message: String,
        detail: String,
        expose_detail: bool,
    },

    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Speech(String),

    #[error("{0}")]
    BadAudio(String),

    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn database(message: impl Into<String>, source: SupabaseError) -> Self {
        AppError::Database {
            message: message.into(),
            detail: source.to_string(),
            expose_detail: false,
        }
    }

    pub fn database_with_details(message: impl Into<String>, source: SupabaseError) -> Self {
        AppError::Database {
            message: message.into(),
            detail: source.to_string(),
            expose_detail: true,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Database {
                message,
                detail,
                expose_detail,
            } => {
                tracing::error!("Database error: {detail}");
                let body = if *expose_detail {
                    json!({ "error": message, "details": detail })
                } else {
                    json!({ "error": message })
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            AppError::Speech(msg) => {
                tracing::error!("Speech error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
            AppError::BadAudio(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": e.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_renders_message_key() {
        let (status, body) = render(AppError::NotFound(
            "No scores found for this interview".to_string(),
        ))
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No scores found for this interview");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_validation_renders_error_key() {
        let (status, body) = render(AppError::Validation("Missing required fields".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields");
    }

    #[tokio::test]
    async fn test_database_detail_hidden_by_default() {
        let source = SupabaseError::Api {
            status: 409,
            message: "duplicate key".to_string(),
        };
        let (status, body) = render(AppError::database("Failed to save personal info", source)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to save personal info");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_database_detail_exposed_when_requested() {
        let source = SupabaseError::Api {
            status: 500,
            message: "connection reset".to_string(),
        };
        let (_, body) = render(AppError::database_with_details(
            "Failed to save response. Please try submitting again.",
            source,
        ))
        .await;
        assert_eq!(
            body["error"],
            "Failed to save response. Please try submitting again."
        );
        assert!(body["details"].as_str().unwrap().contains("connection reset"));
    }
}
