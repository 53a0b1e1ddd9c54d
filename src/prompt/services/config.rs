//! Prompt engine configuration.

use crate::cache::CachePolicy;
use serde::{Deserialize, Serialize};

/// Tunables for [`PromptEngine`](super::PromptEngine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptEngineConfig {
    /// Product name exposed to templates as `product_name`.
    pub product_name: String,
    /// Environment label exposed to templates as `environment`.
    pub environment: String,
    /// Eviction policy of the compiled template cache.
    pub template_cache: CachePolicy,
    /// Eviction policy of the usage counters.
    pub usage_cache: CachePolicy,
}

impl Default for PromptEngineConfig {
    fn default() -> Self {
        Self {
            product_name: "Atelier".to_owned(),
            environment: "development".to_owned(),
            template_cache: CachePolicy::unbounded()
                .with_max_entries(256)
                .with_ttl_secs(3600),
            usage_cache: CachePolicy::unbounded().with_max_entries(1024),
        }
    }
}

impl PromptEngineConfig {
    /// Sets the product name.
    #[must_use]
    pub fn with_product_name(mut self, product_name: impl Into<String>) -> Self {
        self.product_name = product_name.into();
        self
    }

    /// Sets the environment label.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Sets the template cache policy.
    #[must_use]
    pub const fn with_template_cache(mut self, policy: CachePolicy) -> Self {
        self.template_cache = policy;
        self
    }
}
