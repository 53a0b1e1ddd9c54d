//! Individual validation rule implementations.
//!
//! Each rule is a pure function that validates one aspect of a task draft or
//! record. Rules return `Ok(())` on success or a specific
//! `TaskValidationError` on failure.

use crate::task::{
    domain::{AgentId, HistoryAction, Task, TaskDraft, TaskValidationError},
    ports::TaskValidationConfig,
};

/// Validates that the project identifier is present.
///
/// # Errors
///
/// Returns `TaskValidationError::MissingProjectId` if it is blank.
pub fn validate_project_id(project_id: &str) -> Result<(), TaskValidationError> {
    if project_id.trim().is_empty() {
        return Err(TaskValidationError::MissingProjectId);
    }
    Ok(())
}

/// Validates that the requester agent is present and accepted.
///
/// # Errors
///
/// Returns `TaskValidationError::MissingRequesterAgent` if blank or
/// `TaskValidationError::UnknownRequesterAgent` if malformed or not accepted.
pub fn validate_requester_agent(
    agent: &str,
    config: &TaskValidationConfig,
) -> Result<(), TaskValidationError> {
    if agent.trim().is_empty() {
        return Err(TaskValidationError::MissingRequesterAgent);
    }
    if !is_accepted_agent(agent, config) {
        return Err(TaskValidationError::UnknownRequesterAgent(agent.to_owned()));
    }
    Ok(())
}

/// Validates that the target agent is present and accepted.
///
/// # Errors
///
/// Returns `TaskValidationError::MissingTargetAgent` if blank or
/// `TaskValidationError::UnknownTargetAgent` if malformed or not accepted.
pub fn validate_target_agent(
    agent: &str,
    config: &TaskValidationConfig,
) -> Result<(), TaskValidationError> {
    if agent.trim().is_empty() {
        return Err(TaskValidationError::MissingTargetAgent);
    }
    if !is_accepted_agent(agent, config) {
        return Err(TaskValidationError::UnknownTargetAgent(agent.to_owned()));
    }
    Ok(())
}

fn is_accepted_agent(agent: &str, config: &TaskValidationConfig) -> bool {
    AgentId::new(agent).is_ok() && config.is_known_agent(agent)
}

/// Validates that the priority lies within the configured range.
///
/// # Errors
///
/// Returns `TaskValidationError::PriorityOutOfRange` otherwise.
pub const fn validate_priority(
    priority: i32,
    config: &TaskValidationConfig,
) -> Result<(), TaskValidationError> {
    if priority < config.min_priority || priority > config.max_priority {
        return Err(TaskValidationError::PriorityOutOfRange {
            priority,
            min: config.min_priority,
            max: config.max_priority,
        });
    }
    Ok(())
}

/// Validates that the prompt is non-empty and within the length limit.
///
/// # Errors
///
/// Returns `TaskValidationError::EmptyPrompt` or
/// `TaskValidationError::PromptTooLong`.
pub fn validate_prompt(
    prompt: &str,
    config: &TaskValidationConfig,
) -> Result<(), TaskValidationError> {
    if prompt.trim().is_empty() {
        return Err(TaskValidationError::EmptyPrompt);
    }
    let length = prompt.chars().count();
    if length > config.max_prompt_length {
        return Err(TaskValidationError::PromptTooLong {
            actual: length,
            max: config.max_prompt_length,
        });
    }
    Ok(())
}

/// Collects every rule violation for a creation draft.
#[must_use]
pub fn draft_violations(
    draft: &TaskDraft,
    config: &TaskValidationConfig,
) -> Vec<TaskValidationError> {
    [
        validate_project_id(&draft.project_id),
        validate_requester_agent(&draft.requester_agent, config),
        validate_target_agent(&draft.target_agent, config),
        validate_priority(draft.priority, config),
        validate_prompt(&draft.prompt, config),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
}

/// Validates that the history starts with the creation entry.
///
/// # Errors
///
/// Returns `TaskValidationError::EmptyHistory` or
/// `TaskValidationError::MissingCreationEntry`.
pub fn validate_history(task: &Task) -> Result<(), TaskValidationError> {
    let first = task
        .history()
        .first()
        .ok_or(TaskValidationError::EmptyHistory)?;
    if first.action != HistoryAction::TaskCreated {
        return Err(TaskValidationError::MissingCreationEntry);
    }
    Ok(())
}

/// Validates that the task was not updated before it was created.
///
/// # Errors
///
/// Returns `TaskValidationError::TimestampsOutOfOrder` otherwise.
pub fn validate_timestamps(task: &Task) -> Result<(), TaskValidationError> {
    if task.updated_at() < task.created_at() {
        return Err(TaskValidationError::TimestampsOutOfOrder);
    }
    Ok(())
}
