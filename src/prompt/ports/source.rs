//! Template source port.

use crate::prompt::domain::{TemplateKey, TemplateRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for template source operations.
pub type PromptSourceResult<T> = Result<T, PromptSourceError>;

/// Supplies uncompiled templates by key.
#[async_trait]
pub trait PromptTemplateSource: Send + Sync {
    /// Loads the template stored under `key`.
    ///
    /// Returns `Ok(None)` when no such template exists.
    async fn load(&self, key: &TemplateKey) -> PromptSourceResult<Option<TemplateRecord>>;
}

/// Errors returned by template sources.
#[derive(Debug, Clone, Error)]
pub enum PromptSourceError {
    /// A key component cannot name a stored template.
    #[error("template key component '{0}' is not a valid name")]
    InvalidKey(String),

    /// Template metadata could not be parsed.
    #[error("metadata for template {key} is invalid: {reason}")]
    InvalidMetadata {
        /// Template key.
        key: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Underlying storage failed.
    #[error("template storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl PromptSourceError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
