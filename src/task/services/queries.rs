//! Read-side queries: agent work queues and outcome metrics.

use super::{TaskLifecycleResult, TaskLifecycleService};
use crate::task::{
    domain::{AgentId, AgentTaskMetrics, MetricsWindow, SETTLED_STATUSES, Task, TaskStatus},
    ports::{EventBus, TaskOrder, TaskQuery, TaskRepository},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::debug;

impl<R, E, C> TaskLifecycleService<R, E, C>
where
    R: TaskRepository,
    E: EventBus,
    C: Clock + Send + Sync,
{
    /// Returns up to `limit` pending or queued tasks for `agent`, highest
    /// priority first and oldest first within a priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`](super::TaskLifecycleError)
    /// when the query fails.
    pub async fn get_tasks_for_agent(
        &self,
        agent: &AgentId,
        limit: usize,
    ) -> TaskLifecycleResult<std::vec::IntoIter<Task>> {
        let query = TaskQuery::new()
            .for_agent(agent.clone())
            .with_statuses([TaskStatus::Pending, TaskStatus::Queued])
            .ordered_by(TaskOrder::PriorityThenCreated)
            .limit(limit);
        let tasks = self.repository.find(&query).await?;
        debug!(agent = %agent, count = tasks.len(), "loaded agent queue");
        Ok(tasks.into_iter())
    }

    /// Aggregates settled outcomes for `agent` over tasks updated within
    /// `window`.
    ///
    /// Every rate is zero when its denominator is zero.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`](super::TaskLifecycleError)
    /// when the query fails.
    pub async fn get_agent_metrics(
        &self,
        agent: &AgentId,
        window: MetricsWindow,
    ) -> TaskLifecycleResult<AgentTaskMetrics> {
        let since = self
            .clock
            .utc()
            .checked_sub_signed(window.span())
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let query = TaskQuery::new()
            .for_agent(agent.clone())
            .with_statuses(SETTLED_STATUSES)
            .updated_since(since);
        let tasks = self.repository.find(&query).await?;
        Ok(AgentTaskMetrics::aggregate(window, &tasks))
    }
}
