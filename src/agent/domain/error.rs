//! Error types for the agent contract and execution pipeline.

use crate::agent::ports::{ModelInvocationError, ModelSelectionError, ResponseCacheError};
use crate::prompt::domain::PromptError;
use crate::task::domain::AgentId;
use crate::task::services::TaskLifecycleError;
use std::fmt;
use thiserror::Error;

/// Reasons a task cannot be processed by a worker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskContractViolation {
    /// No task was supplied.
    #[error("task is required")]
    MissingTask,

    /// The task carries a nil identifier.
    #[error("task id is required")]
    MissingTaskId,

    /// The task is routed to another agent.
    #[error("task is assigned to {actual}, not {expected}")]
    WrongAgent {
        /// Agent processing the task.
        expected: AgentId,
        /// Agent the task targets.
        actual: AgentId,
    },

    /// The task has no prompt to work from.
    #[error("task input prompt is required")]
    MissingPrompt,
}

/// Pipeline step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Choosing the model.
    ModelSelection,
    /// Invoking the model.
    Invocation,
}

impl PipelineStage {
    /// Returns the stage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ModelSelection => "model_selection",
            Self::Invocation => "invocation",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by agents and the shared execution pipeline.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The task does not satisfy the worker contract.
    #[error(transparent)]
    Validation(#[from] TaskContractViolation),

    /// A required collaborator is not wired in.
    #[error("agent configuration error: {0}")]
    Configuration(String),

    /// Model selection or invocation failed.
    #[error("worker execution failed during {stage}: {message}")]
    WorkerExecution {
        /// Failing step.
        stage: PipelineStage,
        /// Underlying failure.
        message: String,
    },

    /// No worker is registered for the agent.
    #[error("no worker registered for agent {0}")]
    UnknownAgent(AgentId),

    /// The lifecycle manager rejected a call.
    #[error(transparent)]
    Lifecycle(#[from] TaskLifecycleError),

    /// Prompt rendering failed.
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// The response cache failed.
    #[error(transparent)]
    Cache(#[from] ResponseCacheError),
}

impl From<ModelSelectionError> for AgentError {
    fn from(err: ModelSelectionError) -> Self {
        Self::WorkerExecution {
            stage: PipelineStage::ModelSelection,
            message: err.to_string(),
        }
    }
}

impl From<ModelInvocationError> for AgentError {
    fn from(err: ModelInvocationError) -> Self {
        Self::WorkerExecution {
            stage: PipelineStage::Invocation,
            message: err.to_string(),
        }
    }
}
