use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{TemplateId, TemplateInfo, TemplateSource};
use crate::errors::AppError;
use crate::render::Template;

/// Loads `{dir}/{id}.html` from disk, parsing each template once.
pub struct FsTemplateSource {
    dir: PathBuf,
    cache: RwLock<HashMap<TemplateId, Arc<Template>>>,
}

impl FsTemplateSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn path_for(&self, id: TemplateId) -> PathBuf {
        self.dir.join(format!("{}.html", id.as_str()))
    }

    #[cfg(test)]
    async fn cached_count(&self) -> usize {
        self.cache.read().await.len()
    }
}

#[async_trait]
impl TemplateSource for FsTemplateSource {
    async fn load(&self, id: TemplateId) -> Result<Arc<Template>, AppError> {
        if let Some(template) = self.cache.read().await.get(&id) {
            return Ok(Arc::clone(template));
        }

        let path = self.path_for(id);
        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!("Template '{id}' not found")));
            }
            Err(e) => {
                return Err(AppError::Internal(anyhow::Error::new(e).context(format!(
                    "Failed to read template {}",
                    path.display()
                ))));
            }
        };

        let template = Arc::new(Template::parse(&source));
        info!("Loaded template '{id}' from {}", path.display());

        // A concurrent loader may have won the race; keep whichever landed first.
        let mut cache = self.cache.write().await;
        Ok(Arc::clone(cache.entry(id).or_insert(template)))
    }

    async fn available(&self) -> Vec<TemplateInfo> {
        let mut found = Vec::new();
        for id in TemplateId::all() {
            match tokio::fs::try_exists(self.path_for(*id))
                .await
                .with_context(|| format!("checking template '{id}'"))
            {
                Ok(true) => found.push(TemplateInfo::from(*id)),
                Ok(false) => {}
                Err(e) => debug!("{e:#}"),
            }
        }
        found
    }
}
