//! Lifecycle coordination port used by agents.

use crate::task::{
    domain::{Task, TaskDraft, TaskId},
    services::{RecordOutputRequest, TaskLifecycleResult, TransitionTaskRequest},
};
use async_trait::async_trait;

/// Task lifecycle operations an agent may drive.
///
/// Agents hold this as a trait object so they stay independent of the
/// storage and event bus behind the lifecycle service.
#[async_trait]
pub trait TaskCoordinator: Send + Sync {
    /// Creates a pending task.
    async fn create_task(&self, draft: TaskDraft) -> TaskLifecycleResult<Task>;

    /// Looks a task up by identifier.
    async fn get_task(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>>;

    /// Attaches output and routes the task by confidence.
    async fn set_output(&self, request: RecordOutputRequest) -> TaskLifecycleResult<Task>;

    /// Moves a task to a new status.
    async fn update_status(&self, request: TransitionTaskRequest) -> TaskLifecycleResult<Task>;
}
