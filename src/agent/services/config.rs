//! Execution pipeline configuration.

use serde::{Deserialize, Serialize};

/// Model used when neither the caller nor a selector picks one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Tunables for [`AgentCore`](super::AgentCore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Fallback model identifier.
    pub default_model: String,
    /// Whether responses are cached when a cache is wired in.
    pub cache_enabled: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_owned(),
            cache_enabled: true,
        }
    }
}

impl PipelineConfig {
    /// Sets the fallback model.
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Turns response caching off.
    #[must_use]
    pub const fn without_cache(mut self) -> Self {
        self.cache_enabled = false;
        self
    }
}
