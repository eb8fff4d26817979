// Prompt templates for the interview model calls. The wording is part of the
// product's behavior (the model was tuned against these exact instructions),
// so edits here change scoring and question output.

use serde_json::Value;

/// Answer-scoring prompt. Replace `{question}` and `{answer}` before sending.
/// Instructs the model to return a bare integer, though the raw reply is
/// stored either way.
pub const EVALUATE_ANSWER_TEMPLATE: &str = r#"You are an AI interviewer evaluating candidate responses.

Question: "{question}"
Answer: "{answer}"

Your task:
- Assign a score from 1 to 10 based solely on the quality and relevance of the answer.
- Only return the numeric score (e.g., 7). Do not include any explanation, feedback, or extra text.
- Output must be a single integer between 1 and 10."#;

/// Requirement-extraction prompt. Replace `{job_description}` before sending.
pub const EXTRACT_REQUIREMENTS_TEMPLATE: &str = r#"You are an expert HR assistant. Extract the key requirements from the following job description:

{job_description}

Return the result as a JSON array of objects. Each object should have:
- "requirement": the name of the requirement
- "description": a short description of the requirement
Only output the JSON array. Do not include any explanation or extra text."#;

/// Question-generation prompt. Replace `{profile}` and `{topics}` before
/// sending. `{topics}` is the serialized output of the requirement-extraction
/// call, errors included.
pub const GENERATE_QUESTIONS_TEMPLATE: &str = r#"You are given the following topics for a
job profile:{profile}
and you have to ask 3 questions related to each topic.
Topics: {topics}
Each question should be clear, concise, and focused on assessing the candidate's skills and fit for the role.
Format the output as a JSON array of objects, each with a "Topic name" with their respective topic's name field."#;

pub fn build_evaluate_prompt(question: &str, answer: &str) -> String {
    EVALUATE_ANSWER_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

pub fn build_requirements_prompt(job_description: &str) -> String {
    EXTRACT_REQUIREMENTS_TEMPLATE.replace("{job_description}", job_description)
}

pub fn build_questions_prompt(profile: &str, topics: &Value) -> String {
    GENERATE_QUESTIONS_TEMPLATE
        .replace("{profile}", profile)
        .replace("{topics}", &topics.to_string())
}

/// Renders a JSON value for interpolation into a prompt: strings go in bare,
/// anything else keeps its JSON form.
pub fn prompt_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_evaluate_prompt_substitution() {
        let prompt = build_evaluate_prompt("What is ownership?", "It moves values.");
        assert!(prompt.contains("Question: \"What is ownership?\""));
        assert!(prompt.contains("Answer: \"It moves values.\""));
        assert!(prompt.contains("single integer between 1 and 10"));
    }

    #[test]
    fn test_requirements_prompt_substitution() {
        let prompt = build_requirements_prompt("Senior Rust engineer, 5+ years.");
        assert!(prompt.contains("Senior Rust engineer, 5+ years."));
        assert!(prompt.starts_with("You are an expert HR assistant."));
    }

    #[test]
    fn test_questions_prompt_serializes_topics() {
        let topics = json!([{"requirement": "Rust", "description": "systems work"}]);
        let prompt = build_questions_prompt("Backend engineer", &topics);
        assert!(prompt.contains("job profile:Backend engineer"));
        assert!(prompt.contains(r#"Topics: [{"description":"systems work","requirement":"Rust"}]"#));
    }

    #[test]
    fn test_prompt_text_rendering() {
        assert_eq!(prompt_text(&json!("plain text")), "plain text");
        assert_eq!(prompt_text(&json!(42)), "42");
        assert_eq!(prompt_text(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
