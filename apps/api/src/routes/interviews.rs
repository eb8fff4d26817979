use anyhow::anyhow;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::{error, info};

use super::{non_blank, present};
use crate::errors::AppError;
use crate::llm::prompts::prompt_text;
use crate::models::EvaluationRecord;
use crate::state::AppState;

const EVALUATION_TABLE: &str = "evaluation_table";

/// POST /submit-response
/// Scores one answer and stores the full exchange. A failed scoring call is
/// not fatal: the `{"error": ...}` object is stored in place of the score so
/// the submission itself still goes through.
pub async fn submit_response(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let (Some(interview_id), Some(question), Some(user_answer), Some(created_at), Some(duration)) = (
        non_blank(&body, "interview_id"),
        non_blank(&body, "question"),
        non_blank(&body, "user_answer"),
        present(&body, "created_at"),
        present(&body, "duration"),
    ) else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };

    let score = match state
        .llm
        .evaluate_answer(&prompt_text(&question), &prompt_text(&user_answer))
        .await
    {
        Ok(raw) => Value::String(raw),
        Err(e) => {
            error!("answer evaluation failed: {e}");
            json!({ "error": e.to_string() })
        }
    };

    let row = EvaluationRecord {
        interview_id,
        question,
        user_answer,
        score,
        created_at,
        duration,
    };
    let value = serde_json::to_value(&row).map_err(|e| AppError::Internal(e.into()))?;
    state
        .supabase
        .insert_row(EVALUATION_TABLE, &value)
        .await
        .map_err(|e| {
            AppError::database_with_details(
                "Failed to save response. Please try submitting again.",
                e,
            )
        })?;

    Ok(Json(json!({ "message": "Response submitted successfully" })))
}

/// POST /evaluate_all_answer
/// Averages the stored scores for one interview, rounded to two decimals.
/// A stored score that is not numeric (a failed evaluation, for instance)
/// fails the whole computation rather than skewing the average.
pub async fn evaluate_all_answers(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let Some(interview_id) = non_blank(&body, "interview_id") else {
        return Err(AppError::Validation("interview_id is required".to_string()));
    };

    let rows = state
        .supabase
        .select_column(
            EVALUATION_TABLE,
            "score",
            "interview_id",
            &prompt_text(&interview_id),
        )
        .await
        .map_err(|e| AppError::database(format!("Supabase error: {e}"), e))?;

    let scores = collect_scores(&rows)?;
    if scores.is_empty() {
        return Err(AppError::NotFound(
            "No scores found for this interview".to_string(),
        ));
    }

    let average = round2(scores.iter().sum::<f64>() / scores.len() as f64);
    info!(
        "interview {} averaged {average} over {} answer(s)",
        prompt_text(&interview_id),
        scores.len()
    );

    Ok(Json(json!({
        "interview_id": interview_id,
        "average_score": average
    })))
}

/// Pulls numeric scores out of the selected rows. Rows without a `score` key
/// are skipped; a present but non-numeric score is an error.
fn collect_scores(rows: &[Value]) -> Result<Vec<f64>, AppError> {
    let mut scores = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(value) = row.get("score") else {
            continue;
        };
        let Some(score) = value.as_f64() else {
            return Err(AppError::Internal(anyhow!(
                "stored score is not numeric: {value}"
            )));
        };
        scores.push(score);
    }
    Ok(scores)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let scores = [6.0, 8.0, 10.0];
        let average = round2(scores.iter().sum::<f64>() / scores.len() as f64);
        assert_eq!(average, 8.0);

        let scores = [7.0, 8.0, 8.0];
        let average = round2(scores.iter().sum::<f64>() / scores.len() as f64);
        assert_eq!(average, 7.67);
    }

    #[test]
    fn test_collects_integer_and_float_scores() {
        let rows = vec![json!({"score": 6}), json!({"score": 8.5})];
        assert_eq!(collect_scores(&rows).unwrap(), vec![6.0, 8.5]);
    }

    #[test]
    fn test_rows_without_score_key_skipped() {
        let rows = vec![json!({"other": 1}), json!({"score": 4})];
        assert_eq!(collect_scores(&rows).unwrap(), vec![4.0]);
    }

    #[test]
    fn test_non_numeric_score_is_error() {
        let rows = vec![json!({"score": "8"})];
        assert!(collect_scores(&rows).is_err());

        let rows = vec![json!({"score": {"error": "HTTP error"}})];
        assert!(collect_scores(&rows).is_err());

        let rows = vec![json!({"score": null})];
        assert!(collect_scores(&rows).is_err());
    }

    #[test]
    fn test_empty_rows_no_scores() {
        assert!(collect_scores(&[]).unwrap().is_empty());
    }
}
