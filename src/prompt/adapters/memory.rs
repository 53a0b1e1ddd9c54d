//! In-memory template source.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::prompt::{
    domain::{TemplateKey, TemplateRecord},
    ports::{PromptSourceError, PromptSourceResult, PromptTemplateSource},
};

/// Thread-safe template registry held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateSource {
    templates: Arc<RwLock<HashMap<TemplateKey, TemplateRecord>>>,
}

impl InMemoryTemplateSource {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `records`.
    #[must_use]
    pub fn with_templates(records: impl IntoIterator<Item = TemplateRecord>) -> Self {
        let templates = records
            .into_iter()
            .map(|record| (record.key.clone(), record))
            .collect();
        Self {
            templates: Arc::new(RwLock::new(templates)),
        }
    }

    /// Stores `record`, replacing any template with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`PromptSourceError::Storage`] when the registry lock is
    /// poisoned.
    pub fn insert(&self, record: TemplateRecord) -> PromptSourceResult<()> {
        self.templates
            .write()
            .map_err(|err| PromptSourceError::storage(std::io::Error::other(err.to_string())))?
            .insert(record.key.clone(), record);
        Ok(())
    }

    /// Removes the template stored under `key`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`PromptSourceError::Storage`] when the registry lock is
    /// poisoned.
    pub fn remove(&self, key: &TemplateKey) -> PromptSourceResult<Option<TemplateRecord>> {
        Ok(self
            .templates
            .write()
            .map_err(|err| PromptSourceError::storage(std::io::Error::other(err.to_string())))?
            .remove(key))
    }
}

#[async_trait]
impl PromptTemplateSource for InMemoryTemplateSource {
    async fn load(&self, key: &TemplateKey) -> PromptSourceResult<Option<TemplateRecord>> {
        let templates = self
            .templates
            .read()
            .map_err(|err| PromptSourceError::storage(std::io::Error::other(err.to_string())))?;
        Ok(templates.get(key).cloned())
    }
}
