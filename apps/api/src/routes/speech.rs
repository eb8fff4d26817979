use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::speech::SpeechError;
use crate::state::AppState;

/// POST /tts
/// JSON body `{"text": "...", "lang": "en"}`. Responds with raw MP3 bytes,
/// which the frontend feeds straight into an audio element.
pub async fn text_to_speech(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Response, AppError> {
    let text = body.get("text").and_then(Value::as_str).unwrap_or_default();
    let lang = body.get("lang").and_then(Value::as_str).unwrap_or("en");

    if text.is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }

    let audio = state
        .speech
        .synthesize(text, lang)
        .await
        .map_err(|e| AppError::Speech(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response())
}

/// POST /stt
/// Multipart form with an `audio` file part. Responds `{"text": ...}` with
/// the transcript. Audio we cannot decode is the client's fault (400);
/// recognizer trouble is ours (500).
pub async fn speech_to_text(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut audio: Option<Bytes> = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() == Some("audio") {
            audio = Some(field.bytes().await.map_err(bad_multipart)?);
        }
    }

    let Some(audio) = audio else {
        return Err(AppError::Validation("No audio file provided".to_string()));
    };

    let text = state.speech.transcribe(audio.to_vec()).await.map_err(|e| {
        if matches!(e, SpeechError::Decode(_)) {
            AppError::BadAudio(e.to_string())
        } else {
            AppError::Speech(e.to_string())
        }
    })?;

    Ok(Json(json!({ "text": text })))
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("invalid multipart request: {e}"))
}
