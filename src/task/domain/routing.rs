//! Confidence-driven status routing policy.

use super::{Confidence, TaskStatus};
use serde::{Deserialize, Serialize};

/// Boundaries mapping an output confidence to the next task status.
///
/// A confidence at or below `failed_at_or_below` fails the task, a
/// confidence at or above `complete_at_or_above` completes it, and anything
/// in between requires human validation.
///
/// # Examples
///
/// ```
/// use atelier::task::domain::{Confidence, ConfidenceThresholds, TaskStatus};
///
/// let thresholds = ConfidenceThresholds::default();
/// let confidence = Confidence::new(0.9).expect("valid confidence");
/// assert_eq!(thresholds.route(confidence), TaskStatus::Completed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    /// Highest confidence that still fails the task.
    pub failed_at_or_below: f64,
    /// Lowest confidence that completes the task without review.
    pub complete_at_or_above: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            failed_at_or_below: 0.0,
            complete_at_or_above: 0.9,
        }
    }
}

impl ConfidenceThresholds {
    /// Returns the status a task with this output confidence moves to.
    #[must_use]
    pub fn route(&self, confidence: Confidence) -> TaskStatus {
        let value = confidence.value();
        if value <= self.failed_at_or_below {
            TaskStatus::Failed
        } else if value >= self.complete_at_or_above {
            TaskStatus::Completed
        } else {
            TaskStatus::NeedsValidation
        }
    }

    /// Returns `true` when `confidence` is too low to complete unreviewed.
    #[must_use]
    pub fn is_low(&self, confidence: Confidence) -> bool {
        confidence.value() < self.complete_at_or_above
    }
}
