//! Event bus port for task lifecycle notifications.

use crate::task::domain::{Confidence, Task, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event publication.
pub type TaskEventResult<T> = Result<T, TaskEventError>;

/// Why a task needs human validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationReason {
    /// The agent's confidence fell below the completion threshold.
    LowConfidence,
    /// The agent or a caller explicitly asked for review.
    AgentRequest,
}

impl ValidationReason {
    /// Returns the canonical reason label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowConfidence => "low_confidence",
            Self::AgentRequest => "agent_request",
        }
    }
}

/// Lifecycle notification published by the task lifecycle service.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    /// A task was created (`task:created`).
    Created {
        /// Snapshot of the new task.
        task: Box<Task>,
    },
    /// A task changed status (`task:<status>`).
    StatusChanged {
        /// Snapshot after the change.
        task: Box<Task>,
        /// Status before the change.
        previous: TaskStatus,
    },
    /// A task needs human review (`validation:required`).
    ValidationRequired {
        /// Task awaiting review.
        task_id: TaskId,
        /// Why review is needed.
        reason: ValidationReason,
        /// Output confidence, when the task has output.
        confidence: Option<Confidence>,
    },
}

impl TaskEvent {
    /// Returns the event channel name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Created { .. } => "task:created".to_owned(),
            Self::StatusChanged { task, .. } => format!("task:{}", task.status().as_str()),
            Self::ValidationRequired { .. } => "validation:required".to_owned(),
        }
    }

    /// Returns the task the event concerns.
    #[must_use]
    pub fn task_id(&self) -> TaskId {
        match self {
            Self::Created { task } | Self::StatusChanged { task, .. } => task.id(),
            Self::ValidationRequired { task_id, .. } => *task_id,
        }
    }
}

/// Publish side of the lifecycle event bus.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publishes an event to every subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`TaskEventError`] when the bus cannot accept the event.
    async fn publish(&self, event: TaskEvent) -> TaskEventResult<()>;
}

/// Errors returned by event bus implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskEventError {
    /// The bus has been shut down.
    #[error("event bus is closed")]
    Closed,

    /// Delivery failed.
    #[error("event delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskEventError {
    /// Wraps a delivery error.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
