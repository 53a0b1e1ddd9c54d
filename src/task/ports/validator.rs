//! Validator port for task records.
//!
//! Defines the abstract interface for checking task drafts and stored task
//! records, plus the advisory status transition check.

use crate::task::domain::{Task, TaskDraft, TaskStatus, TaskValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result type for validation operations.
pub type TaskValidationResult<T> = Result<T, TaskValidationError>;

/// Port for task validation operations.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Collect all validation errors before returning (not fail-fast)
/// - Use `TaskValidationError::from_collected` to combine errors
/// - Be stateless and thread-safe
pub trait TaskValidator: Send + Sync {
    /// Validates a creation draft.
    ///
    /// Checks required fields, agent membership, priority range, and the
    /// prompt.
    ///
    /// # Errors
    ///
    /// Returns `TaskValidationError` enumerating every violated rule.
    fn validate_draft(&self, draft: &TaskDraft) -> TaskValidationResult<()>;

    /// Validates a stored task record.
    ///
    /// # Errors
    ///
    /// Returns `TaskValidationError` enumerating every violated rule.
    fn validate_task(&self, task: &Task) -> TaskValidationResult<()>;

    /// Returns `true` when the advisory transition table permits
    /// `from -> to`.
    fn is_transition_allowed(&self, from: TaskStatus, to: TaskStatus) -> bool {
        from.can_transition_to(to)
    }
}

/// Configuration for task validation rules.
///
/// # Examples
///
/// ```
/// use atelier::task::ports::TaskValidationConfig;
///
/// let config = TaskValidationConfig::default();
/// assert!(config.is_known_agent("content_creator"));
/// assert!(!config.is_known_agent("astrologer"));
///
/// let open = TaskValidationConfig::any_agent();
/// assert!(open.is_known_agent("astrologer"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskValidationConfig {
    /// Agent identifiers accepted as requester or target. An empty set
    /// accepts any well-formed identifier.
    pub known_agents: BTreeSet<String>,
    /// Lowest accepted priority.
    pub min_priority: i32,
    /// Highest accepted priority.
    pub max_priority: i32,
    /// Maximum prompt length in characters.
    pub max_prompt_length: usize,
}

/// Agents accepted by the default configuration.
pub const DEFAULT_AGENTS: [&str; 10] = [
    "human",
    "system",
    "project_manager",
    "content_creator",
    "technical_writer",
    "code_reviewer",
    "qa_tester",
    "designer",
    "seo_specialist",
    "data_analyst",
];

impl Default for TaskValidationConfig {
    fn default() -> Self {
        Self {
            known_agents: DEFAULT_AGENTS.iter().map(|agent| (*agent).to_owned()).collect(),
            min_priority: 0,
            max_priority: 100,
            max_prompt_length: 100_000,
        }
    }
}

impl TaskValidationConfig {
    /// Creates a configuration accepting any well-formed agent identifier.
    #[must_use]
    pub fn any_agent() -> Self {
        Self {
            known_agents: BTreeSet::new(),
            ..Self::default()
        }
    }

    /// Adds agents to the accepted set.
    #[must_use]
    pub fn with_agents<I, S>(mut self, agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_agents.extend(agents.into_iter().map(Into::into));
        self
    }

    /// Returns `true` when `agent` is accepted.
    #[must_use]
    pub fn is_known_agent(&self, agent: &str) -> bool {
        self.known_agents.is_empty()
            || self
                .known_agents
                .contains(&agent.trim().to_ascii_lowercase())
    }
}
