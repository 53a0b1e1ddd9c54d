//! Agent output and execution records attached to tasks.

use super::{AgentId, TaskDomainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Self-reported quality estimate in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Lowest possible confidence.
    pub const ZERO: Self = Self(0.0);

    /// Highest possible confidence.
    pub const CERTAIN: Self = Self(1.0);

    /// Creates a validated confidence score.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ConfidenceOutOfRange`] when the value is
    /// outside `[0, 1]` or not a number.
    pub fn new(value: f64) -> Result<Self, TaskDomainError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TaskDomainError::ConfidenceOutOfRange(value))
        }
    }

    /// Creates a confidence score, clamping out-of-range values and mapping
    /// NaN to zero.
    #[must_use]
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Returns the underlying score.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = TaskDomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Result produced by an agent for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Domain payload produced by the agent.
    pub data: Option<Value>,
    /// Self-reported confidence driving status routing.
    pub confidence_score: Confidence,
    /// Human-readable explanation of the result.
    pub explanation: Option<String>,
    /// Non-fatal warnings raised while producing the result.
    pub warnings: Vec<String>,
    /// Alternative solutions the agent considered.
    pub alternatives: Vec<Value>,
}

impl TaskOutput {
    /// Creates an output carrying only a confidence score.
    #[must_use]
    pub const fn new(confidence_score: Confidence) -> Self {
        Self {
            data: None,
            confidence_score,
            explanation: None,
            warnings: Vec::new(),
            alternatives: Vec::new(),
        }
    }

    /// Sets the output payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Sets the explanation.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Sets warnings.
    #[must_use]
    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = String>) -> Self {
        self.warnings = warnings.into_iter().collect();
        self
    }

    /// Sets alternative solutions.
    #[must_use]
    pub fn with_alternatives(mut self, alternatives: impl IntoIterator<Item = Value>) -> Self {
        self.alternatives = alternatives.into_iter().collect();
        self
    }
}

/// Record of a single agent execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Agent that executed the task.
    pub agent: AgentId,
    /// Model used for the invocation, if any.
    pub model: Option<String>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Tokens consumed by the invocation.
    pub tokens_used: u64,
    /// Monetary cost of the invocation.
    pub cost: f64,
    /// Invocation start time.
    pub started_at: Option<DateTime<Utc>>,
    /// Invocation end time.
    pub completed_at: Option<DateTime<Utc>>,
    /// Prompt template version the agent rendered, if any.
    #[serde(default)]
    pub prompt_version: Option<String>,
}

impl ExecutionRecord {
    /// Creates an execution record for `agent` with zeroed measurements.
    #[must_use]
    pub const fn new(agent: AgentId) -> Self {
        Self {
            agent,
            model: None,
            duration_ms: 0,
            tokens_used: 0,
            cost: 0.0,
            started_at: None,
            completed_at: None,
            prompt_version: None,
        }
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the duration in milliseconds.
    #[must_use]
    pub const fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Sets token usage and cost.
    #[must_use]
    pub const fn with_usage(mut self, tokens_used: u64, cost: f64) -> Self {
        self.tokens_used = tokens_used;
        self.cost = cost;
        self
    }

    /// Records the prompt template version behind the execution.
    #[must_use]
    pub fn with_prompt_version(mut self, version: impl Into<String>) -> Self {
        self.prompt_version = Some(version.into());
        self
    }

    /// Sets the start and end timestamps.
    #[must_use]
    pub fn with_window(mut self, started_at: DateTime<Utc>, completed_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self.completed_at = Some(completed_at);
        self
    }
}
