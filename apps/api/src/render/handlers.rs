//! Axum route handlers for rendering, projection and JSON import/export.

use axum::{extract::State, response::Html, Json};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::render::to_plain_text;
use crate::state::AppState;
use crate::template_source::TemplateInfo;

/// GET /api/v1/templates
///
/// Lists the templates the configured source can serve.
pub async fn handle_list_templates(State(state): State<AppState>) -> Json<Vec<TemplateInfo>> {
    Json(state.templates.available().await)
}

/// POST /api/v1/render
///
/// Merges the record into the template it selects and returns the HTML document.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(record): Json<ResumeRecord>,
) -> Result<Html<String>, AppError> {
    record.validate()?;

    let template = state.templates.load(record.template).await?;
    let html = template.render(&record.to_context()?);
    info!("Rendered template '{}' ({} bytes)", record.template, html.len());

    Ok(Html(html))
}

/// POST /api/v1/render/plain-text
///
/// Returns the plain-text projection used as AI context.
pub async fn handle_plain_text(Json(record): Json<ResumeRecord>) -> Result<String, AppError> {
    record.validate()?;
    Ok(to_plain_text(&record))
}

/// POST /api/v1/import
///
/// Accepts previously exported (or hand-written) JSON and returns the normalized,
/// validated record. The response body is also the JSON export format.
pub async fn handle_import(Json(raw): Json<Value>) -> Result<Json<ResumeRecord>, AppError> {
    let record: ResumeRecord = serde_json::from_value(raw)
        .map_err(|e| AppError::UnprocessableEntity(format!("Not a resume record: {e}")))?;
    record.validate()?;
    Ok(Json(record))
}
