//! Lifecycle service exposed to agents through [`TaskCoordinator`].

use crate::agent::ports::TaskCoordinator;
use crate::task::{
    domain::{Task, TaskDraft, TaskId},
    ports::{EventBus, TaskRepository},
    services::{
        RecordOutputRequest, TaskLifecycleResult, TaskLifecycleService, TransitionTaskRequest,
    },
};
use async_trait::async_trait;
use mockable::Clock;

#[async_trait]
impl<R, E, C> TaskCoordinator for TaskLifecycleService<R, E, C>
where
    R: TaskRepository,
    E: EventBus,
    C: Clock + Send + Sync,
{
    async fn create_task(&self, draft: TaskDraft) -> TaskLifecycleResult<Task> {
        Self::create_task(self, draft).await
    }

    async fn get_task(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Self::get_task(self, task_id).await
    }

    async fn set_output(&self, request: RecordOutputRequest) -> TaskLifecycleResult<Task> {
        Self::set_output(self, request).await
    }

    async fn update_status(&self, request: TransitionTaskRequest) -> TaskLifecycleResult<Task> {
        Self::update_status(self, request).await
    }
}
