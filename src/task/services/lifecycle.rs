//! Service layer for task creation, status transitions, and output routing.

use super::LifecycleConfig;
use crate::task::{
    domain::{
        ExecutionRecord, Task, TaskDomainError, TaskDraft, TaskId, TaskMetadata, TaskOutput,
        TaskStatus, TaskValidationError,
    },
    ports::{
        EventBus, TaskEvent, TaskRepository, TaskRepositoryError, TaskValidator, ValidationReason,
    },
    validation::DefaultTaskValidator,
};
use mockable::Clock;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Agent recorded on status changes made without an explicit actor.
const SYSTEM_AGENT: &str = "system";

/// Request payload for changing a task's status.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTaskRequest {
    task_id: TaskId,
    status: TaskStatus,
    agent: Option<String>,
    details: Map<String, Value>,
    expected_revision: Option<u64>,
}

impl TransitionTaskRequest {
    /// Creates a request moving `task_id` to `status`.
    #[must_use]
    pub fn new(task_id: TaskId, status: TaskStatus) -> Self {
        Self {
            task_id,
            status,
            agent: None,
            details: Map::new(),
            expected_revision: None,
        }
    }

    /// Records the agent responsible for the change.
    #[must_use]
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// Replaces the history details.
    #[must_use]
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = details;
        self
    }

    /// Adds one history detail.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// Fails the change unless the stored revision equals `revision`.
    #[must_use]
    pub const fn with_expected_revision(mut self, revision: u64) -> Self {
        self.expected_revision = Some(revision);
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the requested status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }
}

/// Request payload for attaching agent output to a task.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutputRequest {
    task_id: TaskId,
    output: TaskOutput,
    execution: ExecutionRecord,
    expected_revision: Option<u64>,
}

impl RecordOutputRequest {
    /// Creates a request attaching `output` produced by `execution`.
    #[must_use]
    pub const fn new(task_id: TaskId, output: TaskOutput, execution: ExecutionRecord) -> Self {
        Self {
            task_id,
            output,
            execution,
            expected_revision: None,
        }
    }

    /// Fails the write unless the stored revision equals `revision`.
    #[must_use]
    pub const fn with_expected_revision(mut self, revision: u64) -> Self {
        self.expected_revision = Some(revision);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Input failed validation; every violated rule is enumerated.
    #[error(transparent)]
    Validation(#[from] TaskValidationError),

    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The task changed since the caller read it.
    #[error("revision conflict on task {task_id}: expected {expected}, found {actual}")]
    Conflict {
        /// Task being written.
        task_id: TaskId,
        /// Revision the caller read.
        expected: u64,
        /// Revision currently stored.
        actual: u64,
    },

    /// The transition is outside the table and enforcement is enabled.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Task being transitioned.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// Domain value construction failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),
}

impl From<TaskRepositoryError> for TaskLifecycleError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(task_id) => Self::NotFound(task_id),
            TaskRepositoryError::Conflict {
                task_id,
                expected,
                actual,
            } => Self::Conflict {
                task_id,
                expected,
                actual,
            },
            other => Self::Repository(other),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, E, C>
where
    R: TaskRepository,
    E: EventBus,
    C: Clock + Send + Sync,
{
    pub(super) repository: Arc<R>,
    pub(super) events: Arc<E>,
    pub(super) clock: Arc<C>,
    pub(super) validator: Arc<dyn TaskValidator>,
    pub(super) config: LifecycleConfig,
}

impl<R, E, C> TaskLifecycleService<R, E, C>
where
    R: TaskRepository,
    E: EventBus,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default validator and configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, events: Arc<E>, clock: Arc<C>) -> Self {
        Self {
            repository,
            events,
            clock,
            validator: Arc::new(DefaultTaskValidator::new()),
            config: LifecycleConfig::default(),
        }
    }

    /// Replaces the validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn TaskValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Validates and persists a new pending task, then emits `task:created`.
    ///
    /// Nothing is persisted or emitted when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Validation`] enumerating every violated
    /// rule, or [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create_task(&self, draft: TaskDraft) -> TaskLifecycleResult<Task> {
        self.validator.validate_draft(&draft)?;

        let metadata = TaskMetadata::new(&self.config.schema_version, &self.config.environment)
            .with_tenant(draft.tenant_id.clone())
            .with_tags(draft.tags.clone());
        let task = Task::create(draft, metadata, &*self.clock)?;
        self.repository.insert(&task).await?;

        info!(
            task_id = %task.id(),
            project = %task.project_id(),
            target_agent = %task.target_agent(),
            priority = task.priority(),
            "task created"
        );
        self.publish(TaskEvent::Created {
            task: Box::new(task.clone()),
        })
        .await;
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn get_task(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Moves a task to a new status.
    ///
    /// Appends a `status_changed_<old>_to_<new>` history entry, persists the
    /// task, and emits `task:<new>`. Moving to `needs_validation`
    /// additionally emits `validation:required`. The advisory transition
    /// table is only enforced when [`LifecycleConfig::enforce_transitions`]
    /// is set.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist,
    /// [`TaskLifecycleError::Conflict`] when the revision changed underneath
    /// the caller, or [`TaskLifecycleError::InvalidTransition`] when
    /// enforcement rejects the change.
    pub async fn update_status(&self, request: TransitionTaskRequest) -> TaskLifecycleResult<Task> {
        let task = self.load(request.task_id).await?;
        ensure_revision(&task, request.expected_revision)?;
        self.check_transition(&task, request.status)?;

        let read_revision = task.revision();
        self.commit_transition(task, read_revision, request).await
    }

    /// Attaches agent output and routes the task by confidence.
    ///
    /// Confidence at or below the failure threshold fails the task, at or
    /// above the completion threshold completes it, and anything between
    /// requires validation. The output and the status change are stored in
    /// a single write, so a rejected transition leaves the task untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist,
    /// [`TaskLifecycleError::Conflict`] when the revision changed underneath
    /// the caller, or [`TaskLifecycleError::InvalidTransition`] when
    /// enforcement rejects the routed status.
    pub async fn set_output(&self, request: RecordOutputRequest) -> TaskLifecycleResult<Task> {
        let RecordOutputRequest {
            task_id,
            output,
            execution,
            expected_revision,
        } = request;

        let mut task = self.load(task_id).await?;
        ensure_revision(&task, expected_revision)?;

        let confidence = output.confidence_score;
        let next = self.config.thresholds.route(confidence);
        self.check_transition(&task, next)?;

        let agent = execution.agent.to_string();
        let read_revision = task.revision();
        task.attach_output(output, execution, &*self.clock);
        debug!(
            task_id = %task_id,
            confidence = confidence.value(),
            next = next.as_str(),
            "output recorded"
        );

        self.commit_transition(
            task,
            read_revision,
            TransitionTaskRequest::new(task_id, next)
                .with_agent(agent)
                .with_detail("reason", json!("confidence_routing"))
                .with_detail("confidence", json!(confidence.value())),
        )
        .await
    }

    /// Fails with [`TaskLifecycleError::InvalidTransition`] when enforcement
    /// is on and the table forbids `task` moving to `to`. Otherwise logs
    /// the advisory violation and allows it.
    pub(super) fn check_transition(&self, task: &Task, to: TaskStatus) -> TaskLifecycleResult<()> {
        let from = task.status();
        if self.validator.is_transition_allowed(from, to) {
            return Ok(());
        }
        if self.config.enforce_transitions {
            return Err(TaskLifecycleError::InvalidTransition {
                task_id: task.id(),
                from,
                to,
            });
        }
        warn!(
            task_id = %task.id(),
            from = from.as_str(),
            to = to.as_str(),
            "status change outside the advisory transition table"
        );
        Ok(())
    }

    /// Applies the status change in `request` on top of any pending
    /// mutation of `task`, then persists everything in one write against
    /// `read_revision` and emits the status events.
    ///
    /// Callers run [`Self::check_transition`] before mutating `task`.
    pub(super) async fn commit_transition(
        &self,
        mut task: Task,
        read_revision: u64,
        request: TransitionTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let TransitionTaskRequest {
            task_id,
            status,
            agent,
            details,
            ..
        } = request;

        let from = task.status();
        let actor = agent.unwrap_or_else(|| SYSTEM_AGENT.to_owned());
        task.transition_to(status, &actor, details, &*self.clock);
        self.repository.update(&task, read_revision).await?;

        info!(
            task_id = %task_id,
            from = from.as_str(),
            to = status.as_str(),
            agent = %actor,
            "task status changed"
        );
        self.publish(TaskEvent::StatusChanged {
            task: Box::new(task.clone()),
            previous: from,
        })
        .await;

        if status == TaskStatus::NeedsValidation {
            let confidence = task.output().map(|output| output.confidence_score);
            let reason = match confidence {
                Some(score) if self.config.thresholds.is_low(score) => {
                    ValidationReason::LowConfidence
                }
                _ => ValidationReason::AgentRequest,
            };
            self.publish(TaskEvent::ValidationRequired {
                task_id,
                reason,
                confidence,
            })
            .await;
        }

        Ok(task)
    }

    pub(super) async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    pub(super) async fn publish(&self, event: TaskEvent) {
        let name = event.name();
        let task_id = event.task_id();
        if let Err(err) = self.events.publish(event).await {
            warn!(task_id = %task_id, event = %name, error = %err, "failed to publish task event");
        }
    }
}

fn ensure_revision(task: &Task, expected: Option<u64>) -> TaskLifecycleResult<()> {
    match expected {
        Some(revision) if revision != task.revision() => Err(TaskLifecycleError::Conflict {
            task_id: task.id(),
            expected: revision,
            actual: task.revision(),
        }),
        _ => Ok(()),
    }
}
