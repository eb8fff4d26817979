use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use super::present;
use crate::errors::AppError;
use crate::llm::prompts::prompt_text;
use crate::models::JobDescription;
use crate::state::AppState;

const JOB_DESCRIPTION_TABLE: &str = "job_description";

/// POST /generate_question
/// Two chained model calls: extract requirement topics from the job
/// description, then ask three questions per topic. Model failures ride
/// along inside the returned payload instead of failing the request.
pub async fn generate_question(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let Some(job_description) = present(&body, "job_description") else {
        return Err(AppError::Validation(
            "Missing job_description in request".to_string(),
        ));
    };

    let profile = prompt_text(&job_description);
    let requirements = state.llm.extract_requirements(&profile).await;
    let questions = state.llm.generate_questions(&profile, &requirements).await;

    Ok(Json(json!({ "questions": questions })))
}

/// POST /job_description
/// Stores the posting verbatim. Only `job_description` itself must be
/// present; every other field defaults to an empty string.
pub async fn save_job_description(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    if present(&body, "job_description").is_none() {
        return Err(AppError::Validation(
            "Missing job_description in request".to_string(),
        ));
    }

    let row = JobDescription {
        job_title: field_or_empty(&body, "job_title"),
        company_name: field_or_empty(&body, "company_name"),
        experience_level: field_or_empty(&body, "experience_level"),
        interview_type: field_or_empty(&body, "interview_type"),
        job_description: field_or_empty(&body, "job_description"),
        requirements: field_or_empty(&body, "requirements"),
    };

    let value = serde_json::to_value(&row).map_err(|e| AppError::Internal(e.into()))?;
    state
        .supabase
        .insert_row(JOB_DESCRIPTION_TABLE, &value)
        .await
        .map_err(|e| AppError::database("Failed to save job description", e))?;

    info!("saved job description");
    Ok(Json(json!({ "message": "Job description saved successfully" })))
}

fn field_or_empty(body: &Value, key: &str) -> Value {
    body.get(key)
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_default_empty() {
        let body = json!({ "job_description": "Build backends." });
        assert_eq!(field_or_empty(&body, "job_title"), json!(""));
        assert_eq!(
            field_or_empty(&body, "job_description"),
            json!("Build backends.")
        );
    }

    #[test]
    fn test_null_and_non_string_pass_through() {
        let body = json!({ "job_title": null, "requirements": ["Rust", "SQL"] });
        assert_eq!(field_or_empty(&body, "job_title"), Value::Null);
        assert_eq!(
            field_or_empty(&body, "requirements"),
            json!(["Rust", "SQL"])
        );
    }
}
