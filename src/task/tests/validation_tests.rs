//! Tests for draft and record validation.

use super::support::{SteppingClock, clock, draft};
use crate::task::{
    domain::{Task, TaskDraft, TaskMetadata, TaskValidationError},
    ports::{TaskValidationConfig, TaskValidator},
    validation::{DefaultTaskValidator, rules},
};
use rstest::{fixture, rstest};

#[fixture]
fn validator() -> DefaultTaskValidator {
    DefaultTaskValidator::new()
}

#[rstest]
fn accepts_well_formed_draft(validator: DefaultTaskValidator) {
    assert!(validator.validate_draft(&draft("Plan the sprint")).is_ok());
}

#[rstest]
fn enumerates_every_violation(validator: DefaultTaskValidator) {
    let broken = TaskDraft::new(" ", "", "ghost_writer", "").with_priority(500);

    let error = validator
        .validate_draft(&broken)
        .expect_err("broken draft should fail");
    let violations = error.violations();

    assert_eq!(violations.len(), 5);
    assert!(violations.contains(&&TaskValidationError::MissingProjectId));
    assert!(violations.contains(&&TaskValidationError::MissingRequesterAgent));
    assert!(violations.contains(&&TaskValidationError::UnknownTargetAgent(
        "ghost_writer".to_owned()
    )));
    assert!(violations.contains(&&TaskValidationError::EmptyPrompt));
    assert!(violations.contains(&&TaskValidationError::PriorityOutOfRange {
        priority: 500,
        min: 0,
        max: 100,
    }));
}

#[rstest]
fn single_violation_is_not_wrapped(validator: DefaultTaskValidator) {
    let error = validator
        .validate_draft(&draft("").with_priority(5))
        .expect_err("blank prompt should fail");
    assert_eq!(error, TaskValidationError::EmptyPrompt);
}

#[rstest]
fn empty_agent_registry_accepts_any_well_formed_agent() {
    let validator = DefaultTaskValidator::with_config(TaskValidationConfig::any_agent());
    let custom = TaskDraft::new("p", "scheduler_bot", "translator", "Translate");
    assert!(validator.validate_draft(&custom).is_ok());

    let malformed = TaskDraft::new("p", "scheduler-bot", "translator", "Translate");
    assert!(validator.validate_draft(&malformed).is_err());
}

#[rstest]
fn agent_lookup_ignores_case(validator: DefaultTaskValidator) {
    let shouted = TaskDraft::new("p", "Human", "CONTENT_CREATOR", "Draft");
    assert!(validator.validate_draft(&shouted).is_ok());
}

#[rstest]
fn prompt_length_is_capped() {
    let config = TaskValidationConfig {
        max_prompt_length: 10,
        ..TaskValidationConfig::default()
    };
    let result = rules::validate_prompt("this prompt is too long", &config);
    assert!(matches!(
        result,
        Err(TaskValidationError::PromptTooLong { max: 10, .. })
    ));
}

#[rstest]
fn created_task_passes_record_validation(validator: DefaultTaskValidator, clock: SteppingClock) {
    let task = Task::create(draft("Audit"), TaskMetadata::new("1.0", "test"), &clock)
        .expect("task");
    assert!(validator.validate_task(&task).is_ok());
}
