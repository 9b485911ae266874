//! Template Source: resolves a template ID to a parsed, cached `Template`.
//!
//! The engine only ever sees template text that was resolved here first.

mod fs;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::render::Template;

pub use fs::FsTemplateSource;

/// The closed set of template identifiers a record may select.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    Classic,
    #[default]
    Modern,
    Creative,
    Minimalist,
    Professional,
    Executive,
    Technical,
    TwoColumn,
    Elegant,
    Compact,
    ModernExecutive,
    Academic,
    Sales,
}

impl TemplateId {
    const ALL: [TemplateId; 13] = [
        TemplateId::Classic,
        TemplateId::Modern,
        TemplateId::Creative,
        TemplateId::Minimalist,
        TemplateId::Professional,
        TemplateId::Executive,
        TemplateId::Technical,
        TemplateId::TwoColumn,
        TemplateId::Elegant,
        TemplateId::Compact,
        TemplateId::ModernExecutive,
        TemplateId::Academic,
        TemplateId::Sales,
    ];

    pub fn all() -> &'static [TemplateId] {
        &Self::ALL
    }

    /// Wire name, also the template's file stem.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Modern => "modern",
            TemplateId::Creative => "creative",
            TemplateId::Minimalist => "minimalist",
            TemplateId::Professional => "professional",
            TemplateId::Executive => "executive",
            TemplateId::Technical => "technical",
            TemplateId::TwoColumn => "two-column",
            TemplateId::Elegant => "elegant",
            TemplateId::Compact => "compact",
            TemplateId::ModernExecutive => "modern-executive",
            TemplateId::Academic => "academic",
            TemplateId::Sales => "sales",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TemplateId::Classic => "Classic",
            TemplateId::Modern => "Modern",
            TemplateId::Creative => "Creative",
            TemplateId::Minimalist => "Minimalist",
            TemplateId::Professional => "Professional",
            TemplateId::Executive => "Executive",
            TemplateId::Technical => "Technical",
            TemplateId::TwoColumn => "Two Column",
            TemplateId::Elegant => "Elegant",
            TemplateId::Compact => "Compact",
            TemplateId::ModernExecutive => "Modern Executive",
            TemplateId::Academic => "Academic",
            TemplateId::Sales => "Sales",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown template '{s}'")))
    }
}

/// Listing entry for a template present in the source.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
}

impl From<TemplateId> for TemplateInfo {
    fn from(id: TemplateId) -> Self {
        TemplateInfo {
            id,
            name: id.display_name(),
        }
    }
}

/// Anything that can hand the engine template documents.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Loads and parses the template for `id`. Missing templates are `AppError::NotFound`.
    async fn load(&self, id: TemplateId) -> Result<Arc<Template>, AppError>;

    /// Templates this source can actually serve, in `TemplateId::all()` order.
    async fn available(&self) -> Vec<TemplateInfo>;
}
