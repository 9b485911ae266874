//! Resume tailoring: rewrites a record towards a job description via the LLM.
//!
//! Flow: to_plain_text → analysis call → improvement call → extract JSON →
//!       parse ResumeRecord → validate.
//!
//! The returned record is validated the same way as an imported one before it
//! can reach the template engine.

pub mod extract;
pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::resume::ResumeRecord;
use crate::render::to_plain_text;
use crate::tailoring::extract::extract_json_block;
use crate::tailoring::prompts::{analysis_prompt, improvement_prompt};

/// Shortest job description worth tailoring against.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 20;

/// Credentials and model for one tailoring run.
#[derive(Debug, Clone)]
pub struct GenerationTarget {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorResponse {
    pub analysis: String,
    pub resume: ResumeRecord,
}

/// Runs the two-step tailoring pipeline for `record` against `job_description`.
pub async fn tailor_resume(
    llm: &dyn TextGenerator,
    target: &GenerationTarget,
    record: &ResumeRecord,
    job_description: &str,
) -> Result<TailorResponse, AppError> {
    let job_description = job_description.trim();
    if job_description.chars().count() < MIN_JOB_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "Job description must be at least {MIN_JOB_DESCRIPTION_CHARS} characters"
        )));
    }

    let resume_text = to_plain_text(record);

    // Step 1: analysis
    info!("Requesting resume analysis (model: {})", target.model);
    let analysis = llm
        .generate(
            &analysis_prompt(&resume_text, job_description),
            &target.api_key,
            &target.model,
        )
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))?;

    // Step 2: rewrite as JSON
    let reply = llm
        .generate(
            &improvement_prompt(&resume_text, job_description, &analysis),
            &target.api_key,
            &target.model,
        )
        .await
        .map_err(|e| AppError::Llm(format!("Resume improvement failed: {e}")))?;

    let resume = parse_improved_record(&reply, record)?;
    resume.validate()?;
    info!(
        "Tailored resume: {} experience entries, template {}",
        resume.experience.len(),
        resume.template
    );

    Ok(TailorResponse {
        analysis: analysis.trim().to_string(),
        resume,
    })
}

/// Parses the model's reply into a record, keeping the original template if the reply omits it.
pub fn parse_improved_record(reply: &str, original: &ResumeRecord) -> Result<ResumeRecord, AppError> {
    let json = extract_json_block(reply).ok_or_else(|| {
        AppError::UnprocessableEntity("AI reply did not contain a JSON object".to_string())
    })?;

    let mut value: Value = serde_json::from_str(json)
        .map_err(|e| AppError::UnprocessableEntity(format!("AI reply is not valid JSON: {e}")))?;

    if let Value::Object(fields) = &mut value {
        fields
            .entry("template")
            .or_insert_with(|| Value::String(original.template.as_str().to_string()));
    }

    serde_json::from_value(value).map_err(|e| {
        AppError::UnprocessableEntity(format!("AI reply does not match the resume shape: {e}"))
    })
}
