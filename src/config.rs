//! Crate-wide configuration aggregate.

use crate::agent::services::PipelineConfig;
use crate::prompt::services::PromptEngineConfig;
use crate::task::{
    ports::TaskValidationConfig, services::LifecycleConfig, validation::DefaultTaskValidator,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for every bounded context, loadable from JSON.
///
/// Every section and field is optional and falls back to its default.
///
/// # Examples
///
/// ```
/// use atelier::config::AtelierConfig;
///
/// let config = AtelierConfig::from_json_str(
///     r#"{"lifecycle": {"environment": "staging"}, "pipeline": {"cache_enabled": false}}"#,
/// )
/// .expect("valid config");
/// assert_eq!(config.lifecycle.environment, "staging");
/// assert!(!config.pipeline.cache_enabled);
/// assert_eq!(config.lifecycle.similar_task_limit, 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtelierConfig {
    /// Task validation rules.
    pub validation: TaskValidationConfig,
    /// Lifecycle service tunables.
    pub lifecycle: LifecycleConfig,
    /// Agent execution pipeline tunables.
    pub pipeline: PipelineConfig,
    /// Prompt engine tunables.
    pub prompt: PromptEngineConfig,
}

/// Failure to load an [`AtelierConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for the configuration shape.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured priority range is empty.
    #[error("priority range {min}..={max} is empty")]
    EmptyPriorityRange {
        /// Configured minimum.
        min: i32,
        /// Configured maximum.
        max: i32,
    },
}

impl AtelierConfig {
    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or mistyped fields,
    /// and [`ConfigError::EmptyPriorityRange`] when the minimum priority
    /// exceeds the maximum.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        let (min, max) = (config.validation.min_priority, config.validation.max_priority);
        if min > max {
            return Err(ConfigError::EmptyPriorityRange { min, max });
        }
        Ok(config)
    }

    /// Builds the task validator described by the validation section.
    #[must_use]
    pub fn validator(&self) -> DefaultTaskValidator {
        DefaultTaskValidator::with_config(self.validation.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::{AtelierConfig, ConfigError};
    use rstest::rstest;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AtelierConfig::from_json_str("{}").expect("valid config");

        assert_eq!(config, AtelierConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AtelierConfig::from_json_str(
            r#"{
                "lifecycle": {"thresholds": {"complete_at_or_above": 0.8}},
                "prompt": {"product_name": "Hearth"}
            }"#,
        )
        .expect("valid config");

        assert!((config.lifecycle.thresholds.complete_at_or_above - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.prompt.product_name, "Hearth");
        assert_eq!(config.prompt.environment, "development");
        assert_eq!(config.pipeline, Default::default());
    }

    #[rstest]
    #[case::malformed("{", "invalid configuration")]
    #[case::mistyped(r#"{"pipeline": {"cache_enabled": "yes"}}"#, "invalid configuration")]
    fn bad_documents_are_rejected(#[case] document: &str, #[case] message: &str) {
        let error = AtelierConfig::from_json_str(document).expect_err("config should fail");

        assert!(matches!(error, ConfigError::Parse(_)));
        assert!(error.to_string().starts_with(message));
    }

    #[test]
    fn inverted_priority_range_is_rejected() {
        let error = AtelierConfig::from_json_str(
            r#"{"validation": {"min_priority": 10, "max_priority": 1}}"#,
        )
        .expect_err("config should fail");

        assert!(matches!(
            error,
            ConfigError::EmptyPriorityRange { min: 10, max: 1 }
        ));
    }
}
