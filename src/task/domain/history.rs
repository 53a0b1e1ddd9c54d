//! Append-only task history entries.

use super::TaskStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of event recorded in a task's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryAction {
    /// The task was created.
    TaskCreated,
    /// The task moved between statuses.
    StatusChanged {
        /// Previous status.
        from: TaskStatus,
        /// New status.
        to: TaskStatus,
    },
    /// An agent attached output to the task.
    OutputGenerated,
    /// A human reviewed the task result.
    HumanFeedbackReceived,
    /// A human rejected the result and requested a correction task.
    CorrectionRequested,
}

impl HistoryAction {
    /// Returns the canonical action label, e.g.
    /// `status_changed_pending_to_queued`.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::TaskCreated => "task_created".to_owned(),
            Self::StatusChanged { from, to } => {
                format!("status_changed_{}_to_{}", from.as_str(), to.as_str())
            }
            Self::OutputGenerated => "output_generated".to_owned(),
            Self::HumanFeedbackReceived => "human_feedback_received".to_owned(),
            Self::CorrectionRequested => "correction_requested".to_owned(),
        }
    }

    /// Returns `true` for review and correction entries.
    #[must_use]
    pub const fn is_feedback(self) -> bool {
        matches!(self, Self::HumanFeedbackReceived | Self::CorrectionRequested)
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One entry of a task's append-only history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
    /// Agent or reviewer responsible for the change.
    pub agent: String,
    /// What happened.
    pub action: HistoryAction,
    /// Free-form details attached to the change.
    pub details: Map<String, Value>,
}

impl HistoryEntry {
    /// Creates a history entry.
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        agent: impl Into<String>,
        action: HistoryAction,
        details: Map<String, Value>,
    ) -> Self {
        Self {
            timestamp,
            agent: agent.into(),
            action,
            details,
        }
    }
}
