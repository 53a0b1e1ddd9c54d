//! The contract every worker implements.

use crate::agent::domain::{AgentError, AgentResult};
use crate::task::domain::{AgentId, Task};
use async_trait::async_trait;

/// A worker that turns tasks addressed to its agent into results.
#[async_trait]
pub trait Worker: Send + Sync {
    /// Returns the agent this worker serves.
    fn agent_id(&self) -> &AgentId;

    /// Processes `task`.
    ///
    /// Implementations never fail: errors become a failed [`AgentResult`]
    /// and the task is driven to `failed`.
    async fn process_task(&self, task: &Task) -> AgentResult;

    /// Feeds the human verdict on `reviewed` back into whatever produced
    /// its output. Returns `true` when the verdict was counted.
    ///
    /// Workers without prompt bookkeeping ignore reviews.
    ///
    /// # Errors
    ///
    /// Returns an [`AgentError`] when the verdict cannot be recorded.
    fn record_review(&self, _reviewed: &Task) -> Result<bool, AgentError> {
        Ok(false)
    }
}
