mod config;
mod errors;
mod llm_client;
mod models;
mod render;
mod routes;
mod state;
mod tailoring;
mod template_source;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::template_source::{FsTemplateSource, TemplateSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize template source
    let templates = FsTemplateSource::new(&config.templates_dir);
    let available = templates.available().await;
    if available.is_empty() {
        warn!(
            "No templates found in {}; render requests will fail",
            config.templates_dir.display()
        );
    } else {
        info!(
            "Template source ready: {} templates in {}",
            available.len(),
            config.templates_dir.display()
        );
    }

    // Initialize LLM client
    let llm = GeminiClient::new(config.gemini_api_url.clone());
    info!(
        "LLM client initialized (default model: {}, server key: {})",
        config.gemini_model,
        if config.gemini_api_key.is_some() { "set" } else { "none" }
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        templates: Arc::new(templates),
        llm: Arc::new(llm),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
