use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::template_source::TemplateSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Resolves template IDs to parsed templates; caches per ID.
    pub templates: Arc<dyn TemplateSource>,
    /// Generative-text backend for tailoring. Default: GeminiClient.
    pub llm: Arc<dyn TextGenerator>,
}
