//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// The project identifier is empty after trimming.
    #[error("project identifier must not be empty")]
    EmptyProjectId,

    /// The agent identifier is empty after trimming.
    #[error("agent identifier must not be empty")]
    EmptyAgentId,

    /// The agent identifier contains characters outside `[a-z0-9_]`.
    #[error(
        "agent identifier '{0}' contains invalid characters (only lowercase alphanumeric and underscores allowed)"
    )]
    InvalidAgentId(String),

    /// The agent identifier exceeds the length limit.
    #[error("agent identifier exceeds 100 character limit: {0}")]
    AgentIdTooLong(String),

    /// The task prompt is empty after trimming.
    #[error("task prompt must not be empty")]
    EmptyPrompt,

    /// A confidence score fell outside `[0, 1]`.
    #[error("confidence score {0} is outside the range [0, 1]")]
    ConfidenceOutOfRange(f64),

    /// A feedback rating fell outside `[1, 5]`.
    #[error("feedback rating {0} is outside the range [1, 5]")]
    RatingOutOfRange(u8),
}

/// Error returned while parsing task statuses from persistence or callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing an agent metrics window.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown metrics window '{0}', expected one of 24h, 7d, 30d")]
pub struct ParseMetricsWindowError(pub String);

/// Structural and semantic violations detected on task records.
///
/// Validators collect every violated rule; several failures are combined
/// into [`TaskValidationError::Multiple`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskValidationError {
    /// The project identifier is missing.
    #[error("project identifier is required")]
    MissingProjectId,

    /// The requester agent is missing.
    #[error("requester agent is required")]
    MissingRequesterAgent,

    /// The target agent is missing.
    #[error("target agent is required")]
    MissingTargetAgent,

    /// The requester agent is not a registered agent.
    #[error("unknown requester agent '{0}'")]
    UnknownRequesterAgent(String),

    /// The target agent is not a registered agent.
    #[error("unknown target agent '{0}'")]
    UnknownTargetAgent(String),

    /// The priority lies outside the configured range.
    #[error("priority {priority} is outside the range [{min}, {max}]")]
    PriorityOutOfRange {
        /// The rejected priority.
        priority: i32,
        /// Lowest accepted priority.
        min: i32,
        /// Highest accepted priority.
        max: i32,
    },

    /// The task prompt is empty or whitespace-only.
    #[error("input prompt must not be empty")]
    EmptyPrompt,

    /// The task prompt exceeds the configured length.
    #[error("input prompt has {actual} characters, exceeds limit of {max}")]
    PromptTooLong {
        /// Prompt length in characters.
        actual: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// The task history is empty.
    #[error("task history must contain at least the creation entry")]
    EmptyHistory,

    /// The first history entry is not the creation entry.
    #[error("task history must start with a task_created entry")]
    MissingCreationEntry,

    /// The task was updated before it was created.
    #[error("task updated_at precedes created_at")]
    TimestampsOutOfOrder,

    /// Multiple validation errors occurred.
    #[error("multiple validation errors: {}", format_errors(.0))]
    Multiple(Vec<Self>),
}

fn format_errors(errors: &[TaskValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl TaskValidationError {
    /// Combines collected validation errors into a single error.
    ///
    /// Returns `None` when nothing was collected and the single error when
    /// exactly one was collected. Nested `Multiple` values are flattened.
    #[must_use]
    pub fn from_collected(errors: Vec<Self>) -> Option<Self> {
        let mut flattened = Vec::with_capacity(errors.len());
        for error in errors {
            match error {
                Self::Multiple(inner) => flattened.extend(inner),
                other => flattened.push(other),
            }
        }
        match flattened.len() {
            0 => None,
            1 => flattened.pop(),
            _ => Some(Self::Multiple(flattened)),
        }
    }

    /// Returns every individual violation carried by this error.
    #[must_use]
    pub fn violations(&self) -> Vec<&Self> {
        match self {
            Self::Multiple(inner) => inner.iter().collect(),
            other => vec![other],
        }
    }
}
