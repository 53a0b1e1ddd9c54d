//! Model invocation payloads.

use crate::task::domain::{AgentId, Confidence};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-call pipeline options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionOptions {
    /// Model to use, bypassing selection.
    pub model: Option<String>,
    /// Skip the response cache for this call.
    pub bypass_cache: bool,
    /// Upper bound on generated tokens.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
}

impl ExecutionOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Skips the response cache.
    #[must_use]
    pub const fn bypassing_cache(mut self) -> Self {
        self.bypass_cache = true;
        self
    }

    /// Caps generated tokens.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Input handed to a model selector.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRequest {
    /// Agent asking for a model.
    pub agent: AgentId,
    /// Prompt to be sent.
    pub prompt: String,
    /// Context to be sent.
    pub context: Map<String, Value>,
    /// Caller options.
    pub options: ExecutionOptions,
}

/// Input handed to a model invoker.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    /// Agent invoking the model.
    pub agent: AgentId,
    /// Model to invoke.
    pub model: String,
    /// Prompt text.
    pub prompt: String,
    /// Structured context.
    pub context: Map<String, Value>,
    /// Caller options.
    pub options: ExecutionOptions,
}

/// Model output with usage accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Domain payload.
    pub data: Option<Value>,
    /// Explanation of the result.
    pub explanation: Option<String>,
    /// Self-reported confidence.
    pub confidence_score: Confidence,
    /// Alternative solutions.
    #[serde(default)]
    pub alternatives: Vec<Value>,
    /// Non-fatal warnings.
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Tokens consumed.
    pub tokens_used: u64,
    /// Cost of the call.
    pub cost: f64,
}

impl ModelResponse {
    /// Creates a response carrying only data and confidence.
    #[must_use]
    pub const fn new(data: Option<Value>, confidence_score: Confidence) -> Self {
        Self {
            data,
            explanation: None,
            confidence_score,
            alternatives: Vec::new(),
            warnings: Vec::new(),
            tokens_used: 0,
            cost: 0.0,
        }
    }

    /// Sets token usage and cost.
    #[must_use]
    pub const fn with_usage(mut self, tokens_used: u64, cost: f64) -> Self {
        self.tokens_used = tokens_used;
        self.cost = cost;
        self
    }

    /// Sets the explanation.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}
