pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::render::handlers as render;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(render::handle_list_templates))
        .route("/api/v1/render", post(render::handle_render))
        .route("/api/v1/render/plain-text", post(render::handle_plain_text))
        .route("/api/v1/import", post(render::handle_import))
        .route("/api/v1/tailor", post(tailoring::handle_tailor))
        .with_state(state)
}
