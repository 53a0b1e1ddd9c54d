//! Running per-agent execution counters.

use crate::task::domain::ratio;
use serde::{Deserialize, Serialize};

/// Counters accumulated by one agent over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentRunMetrics {
    /// Real invocations attempted.
    pub tasks_processed: u32,
    /// Invocations that returned a response.
    pub successful_tasks: u32,
    /// Invocations that failed.
    pub failed_tasks: u32,
    /// Summed wall-clock duration in milliseconds.
    pub total_execution_ms: u64,
    /// Summed invocation cost.
    pub total_cost: f64,
}

impl AgentRunMetrics {
    /// Counts a successful invocation.
    #[expect(clippy::float_arithmetic, reason = "cost accumulation")]
    pub fn record_success(&mut self, duration_ms: u64, cost: f64) {
        self.tasks_processed = self.tasks_processed.saturating_add(1);
        self.successful_tasks = self.successful_tasks.saturating_add(1);
        self.total_execution_ms = self.total_execution_ms.saturating_add(duration_ms);
        self.total_cost += cost;
    }

    /// Counts a failed invocation; failures carry no cost.
    pub const fn record_failure(&mut self, duration_ms: u64) {
        self.tasks_processed = self.tasks_processed.saturating_add(1);
        self.failed_tasks = self.failed_tasks.saturating_add(1);
        self.total_execution_ms = self.total_execution_ms.saturating_add(duration_ms);
    }

    /// Returns the counters together with derived rates.
    #[expect(
        clippy::cast_precision_loss,
        reason = "millisecond totals stay far below 2^52"
    )]
    #[must_use]
    pub fn snapshot(&self) -> AgentMetricsSnapshot {
        AgentMetricsSnapshot {
            counters: *self,
            success_rate: ratio(f64::from(self.successful_tasks), self.tasks_processed),
            avg_execution_ms: ratio(self.total_execution_ms as f64, self.tasks_processed),
            avg_cost: ratio(self.total_cost, self.tasks_processed),
        }
    }
}

/// Agent counters plus rates; every rate is zero before the first task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentMetricsSnapshot {
    /// Raw counters.
    #[serde(flatten)]
    pub counters: AgentRunMetrics,
    /// Successful tasks divided by processed tasks.
    pub success_rate: f64,
    /// Mean duration in milliseconds.
    pub avg_execution_ms: f64,
    /// Mean cost per processed task.
    pub avg_cost: f64,
}
