//! Repository port for task persistence, lookup, and filtered scans.

use crate::task::domain::{AgentId, ProjectId, Task, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Sort order applied to filtered task scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskOrder {
    /// Highest priority first, then oldest creation time first.
    #[default]
    PriorityThenCreated,
    /// Most recently updated first.
    RecentlyUpdated,
}

impl TaskOrder {
    /// Compares two tasks under this order.
    #[must_use]
    pub fn compare(self, left: &Task, right: &Task) -> Ordering {
        match self {
            Self::PriorityThenCreated => right
                .priority()
                .cmp(&left.priority())
                .then_with(|| left.created_at().cmp(&right.created_at())),
            Self::RecentlyUpdated => right.updated_at().cmp(&left.updated_at()),
        }
    }
}

/// Filter, order, and limit for a task scan.
///
/// Unset filters match every task; an empty status list matches every
/// status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Equality filter on the target agent.
    pub target_agent: Option<AgentId>,
    /// Equality filter on the project.
    pub project_id: Option<ProjectId>,
    /// Set-membership filter on the status.
    pub statuses: Vec<TaskStatus>,
    /// Lower bound (inclusive) on the last update time.
    pub updated_since: Option<DateTime<Utc>>,
    /// Result order.
    pub order: TaskOrder,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

impl TaskQuery {
    /// Creates a query matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to tasks routed to `agent`.
    #[must_use]
    pub fn for_agent(mut self, agent: AgentId) -> Self {
        self.target_agent = Some(agent);
        self
    }

    /// Restricts results to tasks in `project`.
    #[must_use]
    pub fn in_project(mut self, project: ProjectId) -> Self {
        self.project_id = Some(project);
        self
    }

    /// Restricts results to the given statuses.
    #[must_use]
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    /// Restricts results to tasks updated at or after `since`.
    #[must_use]
    pub const fn updated_since(mut self, since: DateTime<Utc>) -> Self {
        self.updated_since = Some(since);
        self
    }

    /// Sets the result order.
    #[must_use]
    pub const fn ordered_by(mut self, order: TaskOrder) -> Self {
        self.order = order;
        self
    }

    /// Caps the number of results.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns `true` when `task` satisfies every filter of this query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.target_agent
            .as_ref()
            .is_none_or(|agent| task.target_agent() == agent)
            && self
                .project_id
                .as_ref()
                .is_none_or(|project| task.project_id() == project)
            && (self.statuses.is_empty() || self.statuses.contains(&task.status()))
            && self
                .updated_since
                .is_none_or(|since| task.updated_at() >= since)
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns tasks matching `query`, sorted and limited as requested.
    async fn find(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Replaces a stored task when its stored revision equals
    /// `expected_revision`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::Conflict`] when another writer persisted a
    /// different revision first.
    async fn update(&self, task: &Task, expected_revision: u64) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored revision differs from the one the writer read.
    #[error("revision conflict on task {task_id}: expected {expected}, found {actual}")]
    Conflict {
        /// Task being written.
        task_id: TaskId,
        /// Revision the writer read.
        expected: u64,
        /// Revision currently stored.
        actual: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
