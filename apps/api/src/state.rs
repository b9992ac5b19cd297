use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    /// Gemini in production, a stub in router tests.
    pub llm: Arc<dyn TextGenerator>,
    pub config: Config,
}
