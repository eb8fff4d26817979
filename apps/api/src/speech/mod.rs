//! Speech engines: text-to-speech through the unofficial translate endpoint
//! and speech-to-text through the v2 web recognizer. Both are plain HTTP
//! services; neither needs an account, though the recognizer key is
//! overridable via configuration.

use thiserror::Error;

pub mod stt;
pub mod tts;

pub use stt::DEFAULT_RECOGNIZER_KEY;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("no text to synthesize")]
    EmptyText,

    #[error("audio decode failed: {0}")]
    Decode(String),

    #[error("recognizer returned no transcript")]
    NoTranscript,
}

/// Client for both speech engines. Shares one HTTP connection pool.
#[derive(Clone)]
pub struct SpeechClient {
    http: reqwest::Client,
    recognizer_key: String,
}

impl SpeechClient {
    pub fn new(recognizer_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            recognizer_key,
        }
    }
}
