//! Worker lookup and task dispatch by agent id.

use super::Worker;
use crate::agent::domain::{AgentError, AgentResult};
use crate::task::domain::{AgentId, Task};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Workers keyed by the agent they serve.
#[derive(Clone, Default)]
pub struct AgentRegistry {
    workers: BTreeMap<AgentId, Arc<dyn Worker>>,
}

impl AgentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `worker` under its agent id, returning any worker it
    /// replaces.
    pub fn register(&mut self, worker: Arc<dyn Worker>) -> Option<Arc<dyn Worker>> {
        let agent_id = worker.agent_id().clone();
        debug!(agent = %agent_id, "worker registered");
        self.workers.insert(agent_id, worker)
    }

    /// Returns the worker serving `agent_id`.
    #[must_use]
    pub fn get(&self, agent_id: &AgentId) -> Option<Arc<dyn Worker>> {
        self.workers.get(agent_id).cloned()
    }

    /// Returns the registered agent ids in order.
    pub fn agent_ids(&self) -> impl Iterator<Item = &AgentId> {
        self.workers.keys()
    }

    /// Hands `task` to the worker for its target agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnknownAgent`] when no worker serves the
    /// task's target agent.
    pub async fn dispatch(&self, task: &Task) -> Result<AgentResult, AgentError> {
        let worker = self
            .get(task.target_agent())
            .ok_or_else(|| AgentError::UnknownAgent(task.target_agent().clone()))?;
        debug!(task_id = %task.id(), agent = %task.target_agent(), "dispatching task");
        Ok(worker.process_task(task).await)
    }

    /// Reports the human verdict on `reviewed` to the worker that produced
    /// it. Returns `true` when the worker counted the verdict.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnknownAgent`] when no worker serves the
    /// task's target agent, or the worker's own error.
    pub fn record_review(&self, reviewed: &Task) -> Result<bool, AgentError> {
        let worker = self
            .get(reviewed.target_agent())
            .ok_or_else(|| AgentError::UnknownAgent(reviewed.target_agent().clone()))?;
        worker.record_review(reviewed)
    }
}
