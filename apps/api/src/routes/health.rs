use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Liveness probe; the frontend polls this before starting an interview.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
