use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::template_source::TemplateId;

/// The structured resume record merged against a template.
///
/// Optional string fields may arrive as `""`; use [`present`] to read them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub certifications: Vec<CertificationEntry>,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub template: TemplateId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub title: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub institution: String,
    #[serde(default)]
    pub location: String,
    pub degree: String,
    #[serde(default)]
    pub graduation_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CertificationEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Returns the value of an optional field only when it holds visible text.
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ResumeRecord {
    /// Checks the structural invariants every record must satisfy before rendering.
    ///
    /// Collects every violation instead of stopping at the first one.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut problems = Vec::new();

        for (field, value) in [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("skills", &self.skills),
        ] {
            if value.trim().is_empty() {
                problems.push(format!("{field} is required"));
            }
        }

        if self.experience.is_empty() {
            problems.push("at least one experience entry is required".to_string());
        }
        for (i, exp) in self.experience.iter().enumerate() {
            if !exp.responsibilities.iter().any(|r| !r.trim().is_empty()) {
                problems.push(format!("experience[{i}] needs at least one responsibility"));
            }
        }

        if self.education.is_empty() {
            problems.push("at least one education entry is required".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(problems.join("; ")))
        }
    }

    /// The record as the JSON mapping the template engine renders against.
    pub fn to_context(&self) -> Result<Value, AppError> {
        serde_json::to_value(self)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))
    }
}
