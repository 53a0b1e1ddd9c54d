//! Task aggregate root and related task lifecycle types.

use super::{
    AgentId, ExecutionRecord, HistoryAction, HistoryEntry, HumanFeedback, ProjectId,
    TaskDomainError, TaskDraft, TaskId, TaskOutput, TaskStatus,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Work description handed to the target agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    /// Instruction for the target agent.
    pub prompt: String,
    /// Structured context for the target agent.
    pub context: Map<String, Value>,
    /// Optional data payload.
    pub data: Option<Value>,
}

/// Descriptive metadata stored with each task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetadata {
    /// Record schema version.
    pub version: String,
    /// Deployment environment the task was created in.
    pub environment: String,
    /// Tenant owning the task.
    pub tenant_id: Option<String>,
    /// Free-form labels.
    pub tags: Vec<String>,
}

impl TaskMetadata {
    /// Creates metadata for a schema version and environment.
    #[must_use]
    pub fn new(version: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            environment: environment.into(),
            tenant_id: None,
            tags: Vec::new(),
        }
    }

    /// Sets the tenant.
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: Option<String>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    /// Sets tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    parent_task_id: Option<TaskId>,
    status: TaskStatus,
    priority: i32,
    requester_agent: AgentId,
    target_agent: AgentId,
    input: TaskInput,
    output: Option<TaskOutput>,
    execution: Option<ExecutionRecord>,
    history: Vec<HistoryEntry>,
    human_feedback: Option<HumanFeedback>,
    metadata: TaskMetadata,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted project identifier.
    pub project_id: ProjectId,
    /// Persisted parent link, if any.
    pub parent_task_id: Option<TaskId>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: i32,
    /// Persisted requester agent.
    pub requester_agent: AgentId,
    /// Persisted target agent.
    pub target_agent: AgentId,
    /// Persisted input.
    pub input: TaskInput,
    /// Persisted output, if any.
    pub output: Option<TaskOutput>,
    /// Persisted execution record, if any.
    pub execution: Option<ExecutionRecord>,
    /// Persisted history log.
    pub history: Vec<HistoryEntry>,
    /// Persisted review feedback, if any.
    pub human_feedback: Option<HumanFeedback>,
    /// Persisted metadata.
    pub metadata: TaskMetadata,
    /// Persisted optimistic concurrency revision.
    pub revision: u64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task from a draft.
    ///
    /// The history starts with a single `task_created` entry attributed to the
    /// requester.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when an identifier is malformed or the
    /// prompt is blank.
    pub fn create(
        draft: TaskDraft,
        metadata: TaskMetadata,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let project_id = ProjectId::new(draft.project_id)?;
        let requester_agent = AgentId::new(draft.requester_agent)?;
        let target_agent = AgentId::new(draft.target_agent)?;
        if draft.prompt.trim().is_empty() {
            return Err(TaskDomainError::EmptyPrompt);
        }

        let timestamp = clock.utc();
        let mut details = Map::new();
        details.insert("priority".to_owned(), json!(draft.priority));
        details.insert("target_agent".to_owned(), json!(target_agent.as_str()));
        if let Some(parent) = draft.parent_task_id {
            details.insert("parent_task_id".to_owned(), json!(parent.to_string()));
        }
        let created = HistoryEntry::new(
            timestamp,
            requester_agent.as_str(),
            HistoryAction::TaskCreated,
            details,
        );

        Ok(Self {
            id: TaskId::new(),
            project_id,
            parent_task_id: draft.parent_task_id,
            status: TaskStatus::Pending,
            priority: draft.priority,
            requester_agent,
            target_agent,
            input: TaskInput {
                prompt: draft.prompt,
                context: draft.context,
                data: draft.data,
            },
            output: None,
            execution: None,
            history: vec![created],
            human_feedback: None,
            metadata,
            revision: 0,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            parent_task_id: data.parent_task_id,
            status: data.status,
            priority: data.priority,
            requester_agent: data.requester_agent,
            target_agent: data.target_agent,
            input: data.input,
            output: data.output,
            execution: data.execution,
            history: data.history,
            human_feedback: data.human_feedback,
            metadata: data.metadata,
            revision: data.revision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Returns the task this one was spawned from, if any.
    #[must_use]
    pub const fn parent_task_id(&self) -> Option<TaskId> {
        self.parent_task_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the scheduling priority.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the requesting agent.
    #[must_use]
    pub const fn requester_agent(&self) -> &AgentId {
        &self.requester_agent
    }

    /// Returns the agent the task is routed to.
    #[must_use]
    pub const fn target_agent(&self) -> &AgentId {
        &self.target_agent
    }

    /// Returns the task input.
    #[must_use]
    pub const fn input(&self) -> &TaskInput {
        &self.input
    }

    /// Returns the agent output, if any.
    #[must_use]
    pub const fn output(&self) -> Option<&TaskOutput> {
        self.output.as_ref()
    }

    /// Returns the execution record, if any.
    #[must_use]
    pub const fn execution(&self) -> Option<&ExecutionRecord> {
        self.execution.as_ref()
    }

    /// Returns the append-only history log.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Returns the review feedback, if any.
    #[must_use]
    pub const fn human_feedback(&self) -> Option<&HumanFeedback> {
        self.human_feedback.as_ref()
    }

    /// Returns the task metadata.
    #[must_use]
    pub const fn metadata(&self) -> &TaskMetadata {
        &self.metadata
    }

    /// Returns the optimistic concurrency revision.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when a reviewer approved the task result.
    #[must_use]
    pub fn is_human_approved(&self) -> bool {
        self.human_feedback
            .as_ref()
            .is_some_and(|feedback| feedback.was_approved)
    }

    /// Moves the task to `status`, appending a `status_changed` entry.
    ///
    /// Returns the previous status. The advisory transition table is not
    /// consulted here.
    pub fn transition_to(
        &mut self,
        status: TaskStatus,
        agent: &str,
        details: Map<String, Value>,
        clock: &impl Clock,
    ) -> TaskStatus {
        let previous = self.status;
        self.append(
            agent,
            HistoryAction::StatusChanged {
                from: previous,
                to: status,
            },
            details,
            clock,
        );
        self.status = status;
        previous
    }

    /// Attaches agent output and its execution record.
    pub fn attach_output(
        &mut self,
        output: TaskOutput,
        execution: ExecutionRecord,
        clock: &impl Clock,
    ) {
        let mut details = Map::new();
        details.insert(
            "confidence".to_owned(),
            json!(output.confidence_score.value()),
        );
        details.insert("tokens".to_owned(), json!(execution.tokens_used));
        details.insert("model".to_owned(), json!(execution.model));
        let agent = execution.agent.as_str().to_owned();
        self.output = Some(output);
        self.execution = Some(execution);
        self.append(&agent, HistoryAction::OutputGenerated, details, clock);
    }

    /// Stamps review feedback onto the task.
    pub fn record_feedback(&mut self, feedback: HumanFeedback, clock: &impl Clock) {
        let mut details = Map::new();
        details.insert("was_approved".to_owned(), json!(feedback.was_approved));
        details.insert(
            "rating".to_owned(),
            json!(feedback.rating.map(|rating| rating.value())),
        );
        if let Some(correction) = &feedback.correction {
            details.insert("correction".to_owned(), json!(correction));
        }
        let reviewer = feedback
            .reviewer_id
            .clone()
            .unwrap_or_else(|| "human".to_owned());
        self.human_feedback = Some(feedback);
        self.append(&reviewer, HistoryAction::HumanFeedbackReceived, details, clock);
    }

    /// Records that a correction task was spawned from this task.
    pub fn record_correction_request(
        &mut self,
        correction_task_id: TaskId,
        correction: &str,
        reviewer: &str,
        clock: &impl Clock,
    ) {
        let mut details = Map::new();
        details.insert(
            "correction_task_id".to_owned(),
            json!(correction_task_id.to_string()),
        );
        details.insert("correction".to_owned(), json!(correction));
        self.append(reviewer, HistoryAction::CorrectionRequested, details, clock);
    }

    fn append(
        &mut self,
        agent: &str,
        action: HistoryAction,
        details: Map<String, Value>,
        clock: &impl Clock,
    ) {
        let timestamp = clock.utc();
        self.history
            .push(HistoryEntry::new(timestamp, agent, action, details));
        self.updated_at = timestamp;
        self.revision = self.revision.saturating_add(1);
    }
}
