use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

/// Everything that can go wrong with a detection request. All of it renders
/// as a 400 with `{"success": false, "error": ...}`, the shape the overlay
/// code in the frontend checks before drawing boxes.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("invalid request body: {0}")]
    Body(String),

    #[error("missing image field")]
    MissingImage,

    #[error("invalid base64 image data: {0}")]
    Base64(String),

    #[error("could not decode image: {0}")]
    Image(String),

    #[error("face detection worker is not available")]
    WorkerGone,
}

impl IntoResponse for DetectError {
    fn into_response(self) -> Response {
        warn!("detection request failed: {self}");
        let body = Json(json!({
            "success": false,
            "error": self.to_string()
        }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    #[tokio::test]
    async fn test_errors_render_failure_shape() {
        let response = DetectError::MissingImage.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "missing image field");
    }
}
