//! Worker that builds its prompt from the prompt engine.

use super::{AgentCore, Worker};
use crate::agent::domain::{AgentError, AgentResult, ExecutionOptions};
use crate::prompt::{
    domain::ExecutionOutcome,
    ports::PromptTemplateSource,
    services::{PromptEngine, RenderOptions},
};
use crate::task::{
    domain::{AgentId, Task},
    services::RecordOutputRequest,
};
use async_trait::async_trait;
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Context key naming the task type used for template lookup.
pub const TASK_TYPE_CONTEXT_KEY: &str = "task_type";

/// Task type used when the task context names none.
pub const DEFAULT_TASK_TYPE: &str = "general";

/// Generic worker: renders `<agent>/<task_type>` templates, runs the
/// pipeline, and reports output for confidence routing.
pub struct TemplateWorker<S, C>
where
    S: PromptTemplateSource,
    C: Clock + Send + Sync,
{
    core: AgentCore<C>,
    prompts: Arc<PromptEngine<S, C>>,
    render_options: RenderOptions,
    execution_options: ExecutionOptions,
}

impl<S, C> TemplateWorker<S, C>
where
    S: PromptTemplateSource,
    C: Clock + Send + Sync,
{
    /// Creates a worker around `core` rendering through `prompts`.
    #[must_use]
    pub fn new(core: AgentCore<C>, prompts: Arc<PromptEngine<S, C>>) -> Self {
        Self {
            core,
            prompts,
            render_options: RenderOptions::new(),
            execution_options: ExecutionOptions::new(),
        }
    }

    /// Sets how template versions are chosen.
    #[must_use]
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Sets per-call pipeline options.
    #[must_use]
    pub fn with_execution_options(mut self, options: ExecutionOptions) -> Self {
        self.execution_options = options;
        self
    }

    /// Returns the shared pipeline.
    #[must_use]
    pub const fn core(&self) -> &AgentCore<C> {
        &self.core
    }

    async fn run(&self, task: &Task) -> Result<AgentResult, AgentError> {
        self.core.validate_task(Some(task))?;
        let agent_type = self.core.agent_id().as_str();
        let task_type = task_type_of(task);

        let mut context = task.input().context.clone();
        context.insert(
            "prompt".to_owned(),
            Value::String(task.input().prompt.clone()),
        );
        let rendered = self
            .prompts
            .render_prompt(agent_type, task_type, &context, &self.render_options)
            .await?;

        let execution = match self
            .core
            .execute_with_ai(&rendered.text, &task.input().context, &self.execution_options)
            .await
        {
            Ok(execution) => execution,
            Err(err) => {
                self.record_outcome(task_type, &rendered.version, &ExecutionOutcome::failed());
                return Err(err);
            }
        };

        let output = execution.to_output();
        let record = execution
            .execution
            .clone()
            .with_prompt_version(rendered.version.as_str());
        self.record_outcome(
            task_type,
            &rendered.version,
            &ExecutionOutcome::succeeded(output.confidence_score, execution.response.tokens_used),
        );
        if let Some(coordinator) = self.core.coordinator() {
            coordinator
                .set_output(RecordOutputRequest::new(
                    task.id(),
                    output.clone(),
                    record.clone(),
                ))
                .await?;
        }
        Ok(AgentResult::succeeded(task.id(), output, record)
            .with_prompt_version(rendered.version))
    }

    fn record_outcome(&self, task_type: &str, version: &str, outcome: &ExecutionOutcome) {
        let agent_type = self.core.agent_id().as_str();
        if let Err(err) = self
            .prompts
            .update_metrics(agent_type, task_type, version, outcome)
        {
            warn!(agent = %agent_type, version = %version, error = %err, "prompt metrics not updated");
        }
    }
}

#[async_trait]
impl<S, C> Worker for TemplateWorker<S, C>
where
    S: PromptTemplateSource,
    C: Clock + Send + Sync,
{
    fn agent_id(&self) -> &AgentId {
        self.core.agent_id()
    }

    async fn process_task(&self, task: &Task) -> AgentResult {
        match self.run(task).await {
            Ok(result) => result,
            Err(err) => {
                let task_id = Some(task.id()).filter(|id| !id.is_nil());
                self.core.handle_error(task_id, &err).await
            }
        }
    }

    fn record_review(&self, reviewed: &Task) -> Result<bool, AgentError> {
        let version = reviewed
            .execution()
            .and_then(|execution| execution.prompt_version.as_deref());
        let (Some(feedback), Some(prompt_version)) = (reviewed.human_feedback(), version) else {
            return Ok(false);
        };
        let agent_type = self.core.agent_id().as_str();
        self.prompts.record_review(
            agent_type,
            task_type_of(reviewed),
            prompt_version,
            feedback.was_approved,
        )?;
        debug!(
            task_id = %reviewed.id(),
            agent = %agent_type,
            version = %prompt_version,
            approved = feedback.was_approved,
            "review counted against prompt version"
        );
        Ok(true)
    }
}

fn task_type_of(task: &Task) -> &str {
    task.input()
        .context
        .get(TASK_TYPE_CONTEXT_KEY)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(DEFAULT_TASK_TYPE)
}
