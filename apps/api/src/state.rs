use crate::llm::LlmClient;
use crate::speech::SpeechClient;
use crate::supabase::SupabaseClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// The wrapped HTTP clients share their connection pools across clones.
#[derive(Clone)]
pub struct AppState {
    pub supabase: SupabaseClient,
    pub llm: LlmClient,
    pub speech: SpeechClient,
}
