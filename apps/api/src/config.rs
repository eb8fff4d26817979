use anyhow::{Context, Result};

use crate::speech::DEFAULT_RECOGNIZER_KEY;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_key: String,
    pub mistral_api_key: String,
    pub google_speech_api_key: String,
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// Comma-separated allow-list. `None` means permissive CORS.
    pub allowed_origins: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            supabase_url: require_env("SUPABASE_URL")?,
            supabase_key: require_env("SUPABASE_KEY")?,
            // Optional: LLM-backed routes return embedded error payloads
            // without it, everything else keeps working.
            mistral_api_key: std::env::var("MISTRAL_API_KEY").unwrap_or_default(),
            google_speech_api_key: std::env::var("GOOGLE_SPEECH_API_KEY")
                .unwrap_or_else(|_| DEFAULT_RECOGNIZER_KEY.to_string()),
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .and_then(|raw| parse_origin_list(&raw)),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Splits a comma-separated origin list, dropping blanks. An entirely blank
/// value counts as unset rather than as an empty allow-list.
fn parse_origin_list(raw: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if origins.is_empty() {
        None
    } else {
        Some(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origin_list() {
        let origins = parse_origin_list("http://localhost:3000, https://app.example.com").unwrap();
        assert_eq!(
            origins,
            vec![
                "http://localhost:3000".to_string(),
                "https://app.example.com".to_string()
            ]
        );
    }

    #[test]
    fn test_blank_origin_list_is_unset() {
        assert_eq!(parse_origin_list(""), None);
        assert_eq!(parse_origin_list(" , "), None);
    }
}
