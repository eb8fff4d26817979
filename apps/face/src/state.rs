use crate::detector::DetectorHandle;

/// Shared application state injected into route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub detector: DetectorHandle,
}
