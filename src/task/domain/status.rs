//! Task status and the advisory transition table.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Single authoritative lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but not scheduled.
    Pending,
    /// Task is waiting for its target agent.
    Queued,
    /// Task is being processed by its target agent.
    InProgress,
    /// Task output awaits human review.
    NeedsValidation,
    /// Task has been completed.
    Completed,
    /// Task processing failed; it may be retried.
    Failed,
    /// Task has been cancelled.
    Cancelled,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Queued,
        Self::InProgress,
        Self::NeedsValidation,
        Self::Completed,
        Self::Failed,
        Self::Cancelled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::NeedsValidation => "needs_validation",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` for statuses with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns `true` for statuses waiting to be picked up by an agent.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Pending | Self::Queued)
    }

    /// Returns the statuses reachable from `self` in normal flow.
    ///
    /// The table is advisory: the lifecycle service only enforces it when
    /// configured to.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Queued, Self::InProgress, Self::Cancelled],
            Self::Queued => &[Self::InProgress, Self::Cancelled],
            Self::InProgress => &[
                Self::Completed,
                Self::Failed,
                Self::NeedsValidation,
                Self::Cancelled,
            ],
            Self::NeedsValidation => &[Self::Completed, Self::Failed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
            Self::Failed => &[Self::Pending],
        }
    }

    /// Returns `true` when the advisory table permits `self -> target`.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        self.allowed_transitions().contains(&target)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseTaskStatusError(value.to_owned()))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
