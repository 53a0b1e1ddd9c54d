//! Response cache port.

use crate::agent::domain::{Fingerprint, ModelResponse};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for response cache operations.
pub type ResponseCacheResult<T> = Result<T, ResponseCacheError>;

/// A model response stored with the model that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    /// Model that produced the response.
    pub model: String,
    /// Stored response.
    pub response: ModelResponse,
}

/// Stores model responses keyed by call fingerprint.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Returns the live entry for `fingerprint`, if any.
    async fn lookup(&self, fingerprint: &Fingerprint) -> ResponseCacheResult<Option<CachedResponse>>;

    /// Stores `entry` under `fingerprint`, replacing any previous entry.
    async fn store(&self, fingerprint: Fingerprint, entry: CachedResponse)
    -> ResponseCacheResult<()>;
}

/// Errors returned by response cache adapters.
#[derive(Debug, Clone, Error)]
pub enum ResponseCacheError {
    /// Backing store failure.
    #[error("response cache error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl ResponseCacheError {
    /// Wraps a storage error from the cache adapter.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
