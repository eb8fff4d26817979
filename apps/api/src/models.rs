//! Row shapes for the hosted Postgres tables. These are write-side models:
//! rows are serialized and inserted, never read back whole.

use serde::Serialize;
use serde_json::Value;

/// One row of `user_info`. All profile fields default to empty strings when
/// the form omits them; `avatar_url` serializes as null when no avatar was
/// uploaded.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub education_level: String,
    pub field_of_study: String,
    pub graduation_year: String,
    pub work_experience: String,
    pub skills: String,
    pub avatar_url: Option<String>,
}

/// One row of `job_description`. Client-supplied values pass through
/// verbatim, whatever their JSON type; absent fields become empty strings.
#[derive(Debug, Clone, Serialize)]
pub struct JobDescription {
    pub job_title: Value,
    pub company_name: Value,
    pub experience_level: Value,
    pub interview_type: Value,
    pub job_description: Value,
    pub requirements: Value,
}

/// One row of `evaluation_table`: a single question/answer pair plus its
/// score. `score` holds the model's reply string, or an `{"error": ...}`
/// object when the scoring call failed.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord {
    pub interview_id: Value,
    pub question: Value,
    pub user_answer: Value,
    pub score: Value,
    pub created_at: Value,
    pub duration: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_avatar_serializes_as_null() {
        let row = UserInfo {
            user_id: "u-1".to_string(),
            full_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone_number: String::new(),
            education_level: String::new(),
            field_of_study: String::new(),
            graduation_year: String::new(),
            work_experience: String::new(),
            skills: String::new(),
            avatar_url: None,
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["avatar_url"], Value::Null);
        assert_eq!(value["skills"], "");
    }

    #[test]
    fn test_score_keeps_error_objects_intact() {
        let row = EvaluationRecord {
            interview_id: json!("iv-1"),
            question: json!("Why Rust?"),
            user_answer: json!("Fearless concurrency."),
            score: json!({"error": "HTTP error: connection refused"}),
            created_at: json!("2024-05-01T10:00:00Z"),
            duration: json!(42),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["score"]["error"], "HTTP error: connection refused");
        assert_eq!(value["duration"], 42);
    }
}
