use tracing::debug;

use super::{SpeechClient, SpeechError};

const TTS_URL: &str = "https://translate.google.com/translate_tts";
/// The endpoint rejects long inputs, so text is packed into chunks of at
/// most 100 characters, split on whitespace.
const MAX_CHUNK_CHARS: usize = 100;

impl SpeechClient {
    /// Synthesizes `text` to MP3 in the given language. Chunks are fetched
    /// sequentially and their bytes concatenated; MP3 frames are
    /// self-delimiting, so the result plays back as one stream.
    pub async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, SpeechError> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let total = chunks.len();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, lang, idx, total).await?;
            audio.extend_from_slice(&bytes);
        }
        debug!(
            "synthesized {} chunk(s) into {} bytes of MP3",
            total,
            audio.len()
        );
        Ok(audio)
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        lang: &str,
        idx: usize,
        total: usize,
    ) -> Result<bytes::Bytes, SpeechError> {
        let response = self
            .http
            .get(TTS_URL)
            .query(&[
                ("ie", "UTF-8".to_string()),
                ("q", chunk.to_string()),
                ("tl", lang.to_string()),
                ("total", total.to_string()),
                ("idx", idx.to_string()),
                ("textlen", chunk.chars().count().to_string()),
                ("client", "tw-ob".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // An unknown language code comes back as a 4xx here.
            return Err(SpeechError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.bytes().await?)
    }
}

/// Splits on whitespace and packs words into chunks of at most `max_chars`
/// characters. A single word longer than the limit is hard-split at the
/// character level. Whitespace-only input yields no chunks.
pub(crate) fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let mut piece = String::new();
            let mut piece_len = 0usize;
            for c in word.chars() {
                if piece_len == max_chars {
                    chunks.push(std::mem::take(&mut piece));
                    piece_len = 0;
                }
                piece.push(c);
                piece_len += 1;
            }
            current = piece;
            current_len = piece_len;
        } else if current.is_empty() {
            current = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            chunks.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
