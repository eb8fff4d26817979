/// LLM client — the single point of entry for all Mistral API calls.
///
/// No other module may call the model API directly. Calls are made once, with
/// no retry and no client-side timeout: a slow upstream means a slow request,
/// and a failed upstream surfaces as an error payload, not a crash.
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, info};

pub mod prompts;

const MISTRAL_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";
/// The model used for all LLM calls. Hardcoded to prevent accidental drift.
pub const MODEL: &str = "mistral-small";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model response has no message content")]
    MissingContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// The single LLM client shared by all handlers.
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Sends one user message and returns the whole chat-completion response
    /// as raw JSON. Non-2xx responses still deserialize here; the upstream
    /// error object travels with them.
    async fn chat(&self, prompt: &str) -> Result<Value, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(MISTRAL_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        debug!("chat completion returned status {}", response.status());
        Ok(response.json::<Value>().await?)
    }

    /// Pulls key requirements out of a job description. The raw completion
    /// response is returned as-is; transport failures become an
    /// `{"error": ...}` value so downstream consumers always get JSON.
    pub async fn extract_requirements(&self, job_description: &str) -> Value {
        let prompt = prompts::build_requirements_prompt(job_description);
        match self.chat(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                error!("requirement extraction failed: {e}");
                json!({ "error": e.to_string() })
            }
        }
    }

    /// Generates interview questions for the given profile and topic list.
    /// Same raw pass-through contract as `extract_requirements`; `topics` is
    /// typically the unfiltered output of that call.
    pub async fn generate_questions(&self, profile: &str, topics: &Value) -> Value {
        let prompt = prompts::build_questions_prompt(profile, topics);
        match self.chat(&prompt).await {
            Ok(response) => {
                debug!("question generation response: {response}");
                response
            }
            Err(e) => {
                error!("question generation failed: {e}");
                json!({ "error": e.to_string() })
            }
        }
    }

    /// Scores one question/answer pair. Returns the assistant message content
    /// verbatim, which the prompt asks to be a bare integer but which is never
    /// validated here.
    pub async fn evaluate_answer(&self, question: &str, answer: &str) -> Result<String, LlmError> {
        let prompt = prompts::build_evaluate_prompt(question, answer);
        let response = self.chat(&prompt).await?;
        let content = response
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or(LlmError::MissingContent)?;
        info!("score for question {question:?}: {content}");
        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "mistral-small",
                "messages": [{"role": "user", "content": "hello"}]
            })
        );
    }

    #[test]
    fn test_message_content_pointer() {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": "7"}}]
        });
        let content = response
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str);
        assert_eq!(content, Some("7"));
    }
}
