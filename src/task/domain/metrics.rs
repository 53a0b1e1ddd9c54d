//! Per-agent task outcome aggregation.

use super::{ParseMetricsWindowError, Task, TaskStatus};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Look-back window for agent metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricsWindow {
    /// The last 24 hours.
    #[serde(rename = "24h")]
    Day,
    /// The last 7 days.
    #[serde(rename = "7d")]
    Week,
    /// The last 30 days.
    #[serde(rename = "30d")]
    Month,
}

impl MetricsWindow {
    /// Returns the canonical window label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
        }
    }

    /// Returns the window length.
    #[must_use]
    pub const fn span(self) -> TimeDelta {
        match self {
            Self::Day => TimeDelta::hours(24),
            Self::Week => TimeDelta::days(7),
            Self::Month => TimeDelta::days(30),
        }
    }
}

impl TryFrom<&str> for MetricsWindow {
    type Error = ParseMetricsWindowError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "24h" => Ok(Self::Day),
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            _ => Err(ParseMetricsWindowError(value.to_owned())),
        }
    }
}

/// Statuses counted by [`AgentTaskMetrics`].
pub const SETTLED_STATUSES: [TaskStatus; 3] = [
    TaskStatus::Completed,
    TaskStatus::Failed,
    TaskStatus::NeedsValidation,
];

/// Outcome aggregate for one agent over a window.
///
/// Every rate is zero when its denominator is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTaskMetrics {
    /// Window the aggregate covers.
    pub window: MetricsWindow,
    /// Number of settled tasks in the window.
    pub total_tasks: u32,
    /// Completed tasks.
    pub completed: u32,
    /// Failed tasks.
    pub failed: u32,
    /// Tasks awaiting validation.
    pub needs_validation: u32,
    /// Mean confidence over tasks with output.
    pub average_confidence: f64,
    /// Mean execution duration in milliseconds over tasks with an execution
    /// record.
    pub average_duration_ms: f64,
    /// Summed execution cost.
    pub total_cost: f64,
    /// Approved reviews divided by reviewed tasks.
    pub human_approval_rate: f64,
    /// Completed tasks divided by total tasks.
    pub success_rate: f64,
}

impl AgentTaskMetrics {
    /// Returns an all-zero aggregate.
    #[must_use]
    pub const fn empty(window: MetricsWindow) -> Self {
        Self {
            window,
            total_tasks: 0,
            completed: 0,
            failed: 0,
            needs_validation: 0,
            average_confidence: 0.0,
            average_duration_ms: 0.0,
            total_cost: 0.0,
            human_approval_rate: 0.0,
            success_rate: 0.0,
        }
    }

    /// Aggregates settled tasks; tasks in other statuses are ignored.
    #[expect(
        clippy::float_arithmetic,
        reason = "confidence, duration, and cost aggregates are fractional"
    )]
    #[must_use]
    pub fn aggregate<'a>(window: MetricsWindow, tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut metrics = Self::empty(window);
        let mut confidence_sum = 0.0;
        let mut confidence_count = 0_u32;
        let mut duration_sum = 0.0;
        let mut duration_count = 0_u32;
        let mut reviewed = 0_u32;
        let mut approved = 0_u32;

        for task in tasks {
            match task.status() {
                TaskStatus::Completed => metrics.completed += 1,
                TaskStatus::Failed => metrics.failed += 1,
                TaskStatus::NeedsValidation => metrics.needs_validation += 1,
                _ => continue,
            }
            metrics.total_tasks += 1;

            if let Some(output) = task.output() {
                confidence_sum += output.confidence_score.value();
                confidence_count += 1;
            }
            if let Some(execution) = task.execution() {
                duration_sum += millis_as_f64(execution.duration_ms);
                duration_count += 1;
                metrics.total_cost += execution.cost;
            }
            if let Some(feedback) = task.human_feedback() {
                reviewed += 1;
                if feedback.was_approved {
                    approved += 1;
                }
            }
        }

        metrics.average_confidence = ratio(confidence_sum, confidence_count);
        metrics.average_duration_ms = ratio(duration_sum, duration_count);
        metrics.human_approval_rate = ratio(f64::from(approved), reviewed);
        metrics.success_rate = ratio(f64::from(metrics.completed), metrics.total_tasks);
        metrics
    }
}

/// Divides `numerator` by `count`, yielding zero for an empty denominator.
#[expect(clippy::float_arithmetic, reason = "rate computation")]
pub(crate) fn ratio(numerator: f64, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        numerator / f64::from(count)
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "millisecond durations stay far below 2^52"
)]
const fn millis_as_f64(millis: u64) -> f64 {
    millis as f64
}
