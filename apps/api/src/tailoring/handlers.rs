//! Axum route handlers for the Tailoring API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::state::AppState;
use crate::tailoring::{tailor_resume, GenerationTarget, TailorResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorRequest {
    pub resume: ResumeRecord,
    pub job_description: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

/// POST /api/v1/tailor
///
/// Analyzes the resume against a job description and returns the rewritten record.
/// The API key comes from the request, falling back to `GEMINI_API_KEY`.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    request.resume.validate()?;

    let api_key = non_blank(request.api_key)
        .or_else(|| state.config.gemini_api_key.clone())
        .ok_or_else(|| AppError::Validation("A Gemini API key is required".to_string()))?;
    let model = non_blank(request.model).unwrap_or_else(|| state.config.gemini_model.clone());

    let response = tailor_resume(
        state.llm.as_ref(),
        &GenerationTarget { api_key, model },
        &request.resume,
        &request.job_description,
    )
    .await?;

    Ok(Json(response))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
