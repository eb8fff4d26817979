mod config;
mod errors;
mod llm;
mod models;
mod routes;
mod speech;
mod state;
mod supabase;

use anyhow::Result;
use axum::http::HeaderValue;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm::LlmClient;
use crate::routes::build_router;
use crate::speech::SpeechClient;
use crate::state::AppState;
use crate::supabase::SupabaseClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interviewer API v{}", env!("CARGO_PKG_VERSION"));

    if config.mistral_api_key.is_empty() {
        warn!("MISTRAL_API_KEY is not set; scoring and question generation will return error payloads");
    }

    // Initialize the database/storage client
    let supabase = SupabaseClient::new(config.supabase_url.clone(), config.supabase_key.clone());
    info!("Supabase client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(config.mistral_api_key.clone());
    info!("LLM client initialized (model: {})", llm::MODEL);

    // Initialize the speech engines (TTS + recognizer)
    let speech = SpeechClient::new(config.google_speech_api_key.clone());

    let state = AppState {
        supabase,
        llm,
        speech,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Permissive CORS by default, matching a local frontend on any port. Setting
/// ALLOWED_ORIGINS switches to an explicit allow-list for deployments.
fn cors_layer(config: &Config) -> CorsLayer {
    match &config.allowed_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    }
}
