//! Per-version usage and outcome tracking.

use crate::task::domain::{Confidence, ratio};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies the usage counters of one rendered template version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UsageKey {
    /// Agent type the prompt was rendered for.
    pub agent_type: String,
    /// Requested task type.
    pub task_type: String,
    /// Version actually rendered.
    pub version: String,
}

impl UsageKey {
    /// Creates a usage key.
    #[must_use]
    pub fn new(
        agent_type: impl Into<String>,
        task_type: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            agent_type: agent_type.into(),
            task_type: task_type.into(),
            version: version.into(),
        }
    }
}

/// Outcome of executing a rendered prompt, fed back into usage counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutionOutcome {
    /// Confidence reported for the result, if any.
    pub confidence: Option<Confidence>,
    /// Tokens consumed by the invocation.
    pub tokens_used: u64,
    /// Whether execution produced a result.
    pub success: bool,
}

impl ExecutionOutcome {
    /// Creates a successful outcome with the given confidence and tokens.
    #[must_use]
    pub const fn succeeded(confidence: Confidence, tokens_used: u64) -> Self {
        Self {
            confidence: Some(confidence),
            tokens_used,
            success: true,
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            confidence: None,
            tokens_used: 0,
            success: false,
        }
    }
}

/// Raw counters for one usage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageMetric {
    /// Number of renders.
    pub usage_count: u32,
    /// Time of the first render.
    pub first_used: Option<DateTime<Utc>>,
    /// Time of the most recent render.
    pub last_used: Option<DateTime<Utc>>,
    /// Number of executions reported.
    pub executions: u32,
    /// Summed confidence over executions that reported one.
    pub total_confidence: f64,
    /// Executions that reported a confidence.
    pub confidence_samples: u32,
    /// Summed tokens over executions.
    pub total_tokens: u64,
    /// Successful executions.
    pub successes: u32,
    /// Executions reviewed by a human.
    pub reviewed: u32,
    /// Reviewed executions the reviewer approved.
    pub approved: u32,
}

impl Default for UsageMetric {
    fn default() -> Self {
        Self::empty()
    }
}

impl UsageMetric {
    /// Returns zeroed counters.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            usage_count: 0,
            first_used: None,
            last_used: None,
            executions: 0,
            total_confidence: 0.0,
            confidence_samples: 0,
            total_tokens: 0,
            successes: 0,
            reviewed: 0,
            approved: 0,
        }
    }

    /// Counts one render at `at`.
    pub const fn record_render(&mut self, at: DateTime<Utc>) {
        self.usage_count = self.usage_count.saturating_add(1);
        if self.first_used.is_none() {
            self.first_used = Some(at);
        }
        self.last_used = Some(at);
    }

    /// Counts a human verdict on a result produced by this version.
    pub const fn record_review(&mut self, approved: bool) {
        self.reviewed = self.reviewed.saturating_add(1);
        if approved {
            self.approved = self.approved.saturating_add(1);
        }
    }

    /// Folds one execution outcome into the counters.
    #[expect(clippy::float_arithmetic, reason = "confidence accumulation")]
    pub fn record_outcome(&mut self, outcome: &ExecutionOutcome) {
        self.executions = self.executions.saturating_add(1);
        if let Some(confidence) = outcome.confidence {
            self.total_confidence += confidence.value();
            self.confidence_samples = self.confidence_samples.saturating_add(1);
        }
        self.total_tokens = self.total_tokens.saturating_add(outcome.tokens_used);
        if outcome.success {
            self.successes = self.successes.saturating_add(1);
        }
    }
}

/// Derived, comparable rates for one template version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptVersionMetrics {
    /// Template version.
    pub version: String,
    /// Number of renders.
    pub usage_count: u32,
    /// Number of executions reported.
    pub executions: u32,
    /// Mean reported confidence.
    pub average_confidence: f64,
    /// Mean tokens per execution.
    pub average_tokens: f64,
    /// Successful executions divided by executions.
    pub success_rate: f64,
    /// Reviewed executions divided by executions.
    pub review_rate: f64,
    /// Approved reviews divided by reviews.
    pub approval_rate: f64,
    /// Time of the first render.
    pub first_used: Option<DateTime<Utc>>,
    /// Time of the most recent render.
    pub last_used: Option<DateTime<Utc>>,
}

impl PromptVersionMetrics {
    /// Derives rates from raw counters; empty denominators yield zero.
    #[expect(
        clippy::cast_precision_loss,
        reason = "token totals stay far below 2^52"
    )]
    #[must_use]
    pub fn derive(version: impl Into<String>, metric: &UsageMetric) -> Self {
        Self {
            version: version.into(),
            usage_count: metric.usage_count,
            executions: metric.executions,
            average_confidence: ratio(metric.total_confidence, metric.confidence_samples),
            average_tokens: ratio(metric.total_tokens as f64, metric.executions),
            success_rate: ratio(f64::from(metric.successes), metric.executions),
            review_rate: ratio(f64::from(metric.reviewed), metric.executions),
            approval_rate: ratio(f64::from(metric.approved), metric.reviewed),
            first_used: metric.first_used,
            last_used: metric.last_used,
        }
    }
}
