pub mod health;
pub mod interviews;
pub mod jobs;
pub mod speech;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use serde_json::Value;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/save-personal-info", post(users::save_personal_info))
        .route("/submit-response", post(interviews::submit_response))
        .route(
            "/evaluate_all_answer",
            post(interviews::evaluate_all_answers),
        )
        .route("/generate_question", post(jobs::generate_question))
        .route("/job_description", post(jobs::save_job_description))
        .route("/tts", post(speech::text_to_speech))
        .route("/stt", post(speech::speech_to_text))
        // Avatars and recorded answers arrive as whole files; no size cap.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Field accessor treating JSON null and the empty string as absent.
/// Any other value passes through untouched, whatever its type.
pub(crate) fn non_blank(body: &Value, key: &str) -> Option<Value> {
    match body.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => Some(value.clone()),
    }
}

/// Presence-only accessor: an explicit null passes and is stored as-is.
pub(crate) fn present(body: &Value, key: &str) -> Option<Value> {
    body.get(key).cloned()
}
