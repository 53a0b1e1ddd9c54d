//! Unvalidated task creation input.

use super::TaskId;
use serde_json::{Map, Value};

/// Priority assigned when a caller does not choose one.
pub const DEFAULT_PRIORITY: i32 = 5;

/// Raw task creation input, checked by a
/// [`TaskValidator`](crate::task::ports::TaskValidator) before a
/// [`Task`](super::Task) is built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    /// Project the task belongs to.
    pub project_id: String,
    /// Agent requesting the work.
    pub requester_agent: String,
    /// Agent the work is routed to.
    pub target_agent: String,
    /// Instruction for the target agent.
    pub prompt: String,
    /// Structured context for the target agent.
    pub context: Map<String, Value>,
    /// Optional data payload.
    pub data: Option<Value>,
    /// Scheduling priority; higher runs first.
    pub priority: i32,
    /// Task this one was spawned from.
    pub parent_task_id: Option<TaskId>,
    /// Tenant owning the task.
    pub tenant_id: Option<String>,
    /// Free-form labels.
    pub tags: Vec<String>,
}

impl TaskDraft {
    /// Creates a draft with the required fields and default priority.
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        requester_agent: impl Into<String>,
        target_agent: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            requester_agent: requester_agent.into(),
            target_agent: target_agent.into(),
            prompt: prompt.into(),
            context: Map::new(),
            data: None,
            priority: DEFAULT_PRIORITY,
            parent_task_id: None,
            tenant_id: None,
            tags: Vec::new(),
        }
    }

    /// Replaces the context map.
    #[must_use]
    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = context;
        self
    }

    /// Adds a single context value.
    #[must_use]
    pub fn with_context_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// Sets the data payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Links the draft to a parent task.
    #[must_use]
    pub const fn with_parent(mut self, parent_task_id: TaskId) -> Self {
        self.parent_task_id = Some(parent_task_id);
        self
    }

    /// Sets the tenant.
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Sets tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }
}
