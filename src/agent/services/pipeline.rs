//! Shared execution pipeline and error boundary for workers.

use super::PipelineConfig;
use crate::agent::{
    domain::{
        AgentError, AgentMetricsSnapshot, AgentResult, AgentRunMetrics, AiExecution,
        ExecutionOptions, Fingerprint, ModelRequest, SelectionRequest, TaskContractViolation,
    },
    ports::{CachedResponse, ModelInvoker, ModelSelector, ResponseCache, TaskCoordinator},
};
use crate::task::{
    domain::{AgentId, ExecutionRecord, Task, TaskDraft, TaskId, TaskStatus},
    services::TransitionTaskRequest,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::{Map, Value, json};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

/// Context key marking a subtask's parent.
pub const PARENT_TASK_CONTEXT_KEY: &str = "parent_task_id";

/// Pipeline shared by every worker: response cache, model selection,
/// invocation, metrics, and error handling.
pub struct AgentCore<C>
where
    C: Clock + Send + Sync,
{
    agent_id: AgentId,
    invoker: Arc<dyn ModelInvoker>,
    selector: Option<Arc<dyn ModelSelector>>,
    cache: Option<Arc<dyn ResponseCache>>,
    coordinator: Option<Arc<dyn TaskCoordinator>>,
    clock: Arc<C>,
    config: PipelineConfig,
    metrics: Mutex<AgentRunMetrics>,
}

impl<C> AgentCore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a pipeline for `agent_id` with no cache, selector, or
    /// coordinator.
    #[must_use]
    pub fn new(agent_id: AgentId, invoker: Arc<dyn ModelInvoker>, clock: Arc<C>) -> Self {
        Self {
            agent_id,
            invoker,
            selector: None,
            cache: None,
            coordinator: None,
            clock,
            config: PipelineConfig::default(),
            metrics: Mutex::new(AgentRunMetrics::default()),
        }
    }

    /// Delegates model choice to `selector`.
    #[must_use]
    pub fn with_selector(mut self, selector: Arc<dyn ModelSelector>) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Caches responses in `cache`.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Wires in the lifecycle manager.
    #[must_use]
    pub fn with_coordinator(mut self, coordinator: Arc<dyn TaskCoordinator>) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the agent this pipeline runs for.
    #[must_use]
    pub const fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    /// Returns the lifecycle manager, when wired in.
    #[must_use]
    pub fn coordinator(&self) -> Option<&Arc<dyn TaskCoordinator>> {
        self.coordinator.as_ref()
    }

    /// Returns the running counters and derived rates.
    #[must_use]
    pub fn metrics(&self) -> AgentMetricsSnapshot {
        self.lock_metrics().snapshot()
    }

    /// Checks that `task` exists, has an id, targets this agent, and carries
    /// a prompt.
    ///
    /// # Errors
    ///
    /// Returns the first [`TaskContractViolation`] found.
    pub fn validate_task<'a>(
        &self,
        task: Option<&'a Task>,
    ) -> Result<&'a Task, TaskContractViolation> {
        let found = task.ok_or(TaskContractViolation::MissingTask)?;
        if found.id().is_nil() {
            return Err(TaskContractViolation::MissingTaskId);
        }
        if found.target_agent() != &self.agent_id {
            return Err(TaskContractViolation::WrongAgent {
                expected: self.agent_id.clone(),
                actual: found.target_agent().clone(),
            });
        }
        if found.input().prompt.trim().is_empty() {
            return Err(TaskContractViolation::MissingPrompt);
        }
        Ok(found)
    }

    /// Runs `prompt` through the pipeline.
    ///
    /// A live cache entry for the same agent, prompt, and context is
    /// returned without invoking a model or touching the counters. Otherwise
    /// the model is chosen (caller override, then selector, then the
    /// configured default), invoked, measured, cached, and counted.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::WorkerExecution`] when selection or invocation
    /// fails and [`AgentError::Cache`] when the cache lookup fails. Every
    /// error is counted as a failed task and logged before it is returned.
    pub async fn execute_with_ai(
        &self,
        prompt: &str,
        context: &Map<String, Value>,
        options: &ExecutionOptions,
    ) -> Result<AiExecution, AgentError> {
        let started_at = self.clock.utc();
        match self.run_pipeline(prompt, context, options, started_at).await {
            Ok(execution) => Ok(execution),
            Err(err) => {
                let duration_ms = elapsed_ms(started_at, self.clock.utc());
                self.lock_metrics().record_failure(duration_ms);
                error!(agent = %self.agent_id, duration_ms, error = %err, "model execution failed");
                Err(err)
            }
        }
    }

    /// Converts `err` into a failed result and fails the task through the
    /// lifecycle manager when one is wired in.
    ///
    /// Never fails: a coordinator error is logged and the result is still
    /// returned.
    pub async fn handle_error(&self, task_id: Option<TaskId>, err: &AgentError) -> AgentResult {
        let message = err.to_string();
        error!(agent = %self.agent_id, task_id = ?task_id, error = %message, "task processing failed");

        if let (Some(coordinator), Some(id)) = (&self.coordinator, task_id) {
            let request = TransitionTaskRequest::new(id, TaskStatus::Failed)
                .with_agent(self.agent_id.to_string())
                .with_detail("reason", json!("agent_error"))
                .with_detail("error", json!(message));
            if let Err(update_err) = coordinator.update_status(request).await {
                warn!(task_id = %id, error = %update_err, "could not mark task failed");
            }
        }
        AgentResult::failed(task_id, message)
    }

    /// Spawns a subtask of `parent` for `target_agent`.
    ///
    /// The subtask inherits the parent's context overlaid with
    /// `extra_context` and a `parent_task_id` marker, plus the parent's data
    /// payload and priority.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Configuration`] when no lifecycle manager is
    /// wired in, or [`AgentError::Lifecycle`] when creation fails.
    pub async fn create_subtask(
        &self,
        parent: &Task,
        target_agent: &str,
        prompt: impl Into<String> + Send,
        extra_context: Map<String, Value>,
    ) -> Result<Task, AgentError> {
        let coordinator = self.coordinator.as_ref().ok_or_else(|| {
            AgentError::Configuration("subtasks need a task coordinator".to_owned())
        })?;

        let mut context = parent.input().context.clone();
        context.extend(extra_context);
        context.insert(
            PARENT_TASK_CONTEXT_KEY.to_owned(),
            json!(parent.id().to_string()),
        );
        let mut draft = TaskDraft::new(
            parent.project_id().as_str(),
            self.agent_id.as_str(),
            target_agent,
            prompt,
        )
        .with_context(context)
        .with_priority(parent.priority())
        .with_parent(parent.id());
        draft.data.clone_from(&parent.input().data);

        let subtask = coordinator.create_task(draft).await?;
        info!(
            parent_task_id = %parent.id(),
            task_id = %subtask.id(),
            target_agent = %subtask.target_agent(),
            "subtask created"
        );
        Ok(subtask)
    }

    async fn run_pipeline(
        &self,
        prompt: &str,
        context: &Map<String, Value>,
        options: &ExecutionOptions,
        started_at: DateTime<Utc>,
    ) -> Result<AiExecution, AgentError> {
        let cache = self
            .cache
            .as_ref()
            .filter(|_| self.config.cache_enabled && !options.bypass_cache);
        let fingerprint = cache.map(|_| Fingerprint::compute(&self.agent_id, prompt, context));

        if let (Some(store), Some(key)) = (cache, &fingerprint)
            && let Some(hit) = store.lookup(key).await?
        {
            debug!(agent = %self.agent_id, fingerprint = %key, model = %hit.model, "response cache hit");
            return Ok(AiExecution {
                execution: ExecutionRecord::new(self.agent_id.clone())
                    .with_model(hit.model)
                    .with_window(started_at, started_at),
                response: hit.response,
                from_cache: true,
            });
        }

        let model = self.select_model(prompt, context, options).await?;
        let request = ModelRequest {
            agent: self.agent_id.clone(),
            model: model.clone(),
            prompt: prompt.to_owned(),
            context: context.clone(),
            options: options.clone(),
        };
        let response = self.invoker.invoke(&request).await?;
        let completed_at = self.clock.utc();
        let duration_ms = elapsed_ms(started_at, completed_at);
        let execution = ExecutionRecord::new(self.agent_id.clone())
            .with_model(model.as_str())
            .with_duration_ms(duration_ms)
            .with_usage(response.tokens_used, response.cost)
            .with_window(started_at, completed_at);

        if let (Some(store), Some(key)) = (cache, fingerprint) {
            let entry = CachedResponse {
                model: model.clone(),
                response: response.clone(),
            };
            if let Err(err) = store.store(key, entry).await {
                warn!(agent = %self.agent_id, error = %err, "could not cache model response");
            }
        }

        self.lock_metrics()
            .record_success(duration_ms, response.cost);
        info!(
            agent = %self.agent_id,
            model = %model,
            duration_ms,
            tokens = response.tokens_used,
            confidence = response.confidence_score.value(),
            "model invocation completed"
        );
        Ok(AiExecution {
            response,
            execution,
            from_cache: false,
        })
    }

    async fn select_model(
        &self,
        prompt: &str,
        context: &Map<String, Value>,
        options: &ExecutionOptions,
    ) -> Result<String, AgentError> {
        if let Some(model) = &options.model {
            return Ok(model.clone());
        }
        let Some(selector) = &self.selector else {
            return Ok(self.config.default_model.clone());
        };
        let request = SelectionRequest {
            agent: self.agent_id.clone(),
            prompt: prompt.to_owned(),
            context: context.clone(),
            options: options.clone(),
        };
        let model = selector.select_model(&request).await?;
        debug!(agent = %self.agent_id, model = %model, "model selected");
        Ok(model)
    }

    fn lock_metrics(&self) -> MutexGuard<'_, AgentRunMetrics> {
        // Counters stay consistent even if a holder panicked.
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn elapsed_ms(started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> u64 {
    u64::try_from((completed_at - started_at).num_milliseconds()).unwrap_or(0)
}
