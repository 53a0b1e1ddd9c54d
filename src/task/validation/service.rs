//! Validation service implementation.
//!
//! Provides the default implementation of the `TaskValidator` port,
//! combining individual validation rules into a comprehensive validator.

use crate::task::{
    domain::{Task, TaskDraft, TaskValidationError},
    ports::{TaskValidationConfig, TaskValidationResult, TaskValidator},
    validation::rules,
};

/// Default implementation of the task validator.
///
/// Applies all validation rules, collecting errors to provide comprehensive
/// feedback rather than failing on the first error.
///
/// # Examples
///
/// ```
/// use atelier::task::domain::TaskDraft;
/// use atelier::task::ports::TaskValidator;
/// use atelier::task::validation::DefaultTaskValidator;
///
/// let validator = DefaultTaskValidator::new();
/// let draft = TaskDraft::new("p1", "human", "content_creator", "write X");
/// assert!(validator.validate_draft(&draft).is_ok());
///
/// let broken = TaskDraft::new("", "nobody", "content_creator", " ");
/// let error = validator.validate_draft(&broken).expect_err("invalid draft");
/// assert_eq!(error.violations().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DefaultTaskValidator {
    config: TaskValidationConfig,
}

impl DefaultTaskValidator {
    /// Creates a new validator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: TaskValidationConfig::default(),
        }
    }

    /// Creates a new validator with custom configuration.
    #[must_use]
    pub const fn with_config(config: TaskValidationConfig) -> Self {
        Self { config }
    }

    /// Returns the current validation configuration.
    #[must_use]
    pub const fn config(&self) -> &TaskValidationConfig {
        &self.config
    }
}

impl Default for DefaultTaskValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskValidator for DefaultTaskValidator {
    fn validate_draft(&self, draft: &TaskDraft) -> TaskValidationResult<()> {
        into_result(rules::draft_violations(draft, &self.config))
    }

    fn validate_task(&self, task: &Task) -> TaskValidationResult<()> {
        let errors = [
            rules::validate_history(task),
            rules::validate_timestamps(task),
            rules::validate_priority(task.priority(), &self.config),
            rules::validate_prompt(&task.input().prompt, &self.config),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();
        into_result(errors)
    }
}

fn into_result(errors: Vec<TaskValidationError>) -> TaskValidationResult<()> {
    TaskValidationError::from_collected(errors).map_or(Ok(()), Err)
}
