//! Results produced by the execution pipeline and by workers.

use super::ModelResponse;
use crate::task::domain::{Confidence, ExecutionRecord, TaskId, TaskOutput};
use serde_json::Value;

/// Outcome of one pass through the execution pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AiExecution {
    /// Model response, replayed from cache on a hit.
    pub response: ModelResponse,
    /// Measurements of the invocation that produced the response.
    pub execution: ExecutionRecord,
    /// Whether the response came from the response cache.
    pub from_cache: bool,
}

impl AiExecution {
    /// Converts the response into task output.
    #[must_use]
    pub fn to_output(&self) -> TaskOutput {
        let ModelResponse {
            data,
            explanation,
            confidence_score,
            alternatives,
            warnings,
            ..
        } = self.response.clone();
        let mut output = TaskOutput::new(confidence_score)
            .with_warnings(warnings)
            .with_alternatives(alternatives);
        output.data = data;
        output.explanation = explanation;
        output
    }
}

/// Non-failing result of a worker processing a task.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentResult {
    /// Task the result belongs to, when known.
    pub task_id: Option<TaskId>,
    /// Output reported for the task.
    pub output: TaskOutput,
    /// Execution measurements, absent when nothing was invoked.
    pub execution: Option<ExecutionRecord>,
    /// Whether processing succeeded.
    pub success: bool,
    /// Failure message.
    pub error: Option<String>,
    /// Template version used to build the prompt.
    pub prompt_version: Option<String>,
}

impl AgentResult {
    /// Builds a successful result.
    #[must_use]
    pub const fn succeeded(task_id: TaskId, output: TaskOutput, execution: ExecutionRecord) -> Self {
        Self {
            task_id: Some(task_id),
            output,
            execution: Some(execution),
            success: true,
            error: None,
            prompt_version: None,
        }
    }

    /// Builds a failed result with zero confidence and null data.
    #[must_use]
    pub fn failed(task_id: Option<TaskId>, message: impl Into<String>) -> Self {
        let text = message.into();
        let output = TaskOutput::new(Confidence::ZERO)
            .with_data(Value::Null)
            .with_explanation(format!("processing failed: {text}"))
            .with_warnings([text.clone()]);
        Self {
            task_id,
            output,
            execution: None,
            success: false,
            error: Some(text),
            prompt_version: None,
        }
    }

    /// Records the template version used.
    #[must_use]
    pub fn with_prompt_version(mut self, version: impl Into<String>) -> Self {
        self.prompt_version = Some(version.into());
        self
    }
}
