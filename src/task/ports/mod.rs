//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod events;
pub mod repository;
pub mod validator;

pub use events::{EventBus, TaskEvent, TaskEventError, TaskEventResult, ValidationReason};
pub use repository::{
    TaskOrder, TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
};
pub use validator::{DEFAULT_AGENTS, TaskValidationConfig, TaskValidationResult, TaskValidator};
