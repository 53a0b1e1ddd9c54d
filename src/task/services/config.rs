//! Lifecycle service configuration.

use crate::task::domain::ConfidenceThresholds;
use serde::{Deserialize, Serialize};

/// Tunables for [`TaskLifecycleService`](super::TaskLifecycleService).
///
/// # Examples
///
/// ```
/// use atelier::task::services::LifecycleConfig;
///
/// let config = LifecycleConfig::default();
/// assert_eq!(config.similar_task_limit, 5);
/// assert!(!config.enforce_transitions);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Confidence boundaries used to route agent output.
    pub thresholds: ConfidenceThresholds,
    /// Environment label stamped onto new tasks.
    pub environment: String,
    /// Record schema version stamped onto new tasks.
    pub schema_version: String,
    /// Maximum number of tasks visited when walking a correction chain.
    pub max_feedback_depth: usize,
    /// Maximum number of similar successful tasks returned.
    pub similar_task_limit: usize,
    /// Reject status changes the advisory transition table does not permit.
    pub enforce_transitions: bool,
    /// Agent recorded as the requester of correction tasks.
    pub reviewer_agent: String,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            thresholds: ConfidenceThresholds::default(),
            environment: "development".to_owned(),
            schema_version: "1.0".to_owned(),
            max_feedback_depth: 32,
            similar_task_limit: 5,
            enforce_transitions: false,
            reviewer_agent: "human".to_owned(),
        }
    }
}

impl LifecycleConfig {
    /// Creates a configuration that rejects transitions outside the advisory
    /// table.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            enforce_transitions: true,
            ..Self::default()
        }
    }

    /// Sets the environment label.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Sets the confidence thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: ConfidenceThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}
