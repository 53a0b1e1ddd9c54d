//! Domain model for task lifecycle management.
//!
//! The task domain models task creation, confidence-routed status changes,
//! human review feedback, and per-agent outcome aggregation while keeping
//! all infrastructure concerns outside of the domain boundary.

mod draft;
mod error;
mod feedback;
mod history;
mod ids;
mod metrics;
mod output;
mod routing;
mod status;
mod task;

pub use draft::{DEFAULT_PRIORITY, TaskDraft};
pub use error::{
    ParseMetricsWindowError, ParseTaskStatusError, TaskDomainError, TaskValidationError,
};
pub use feedback::{FeedbackSubmission, HumanFeedback, Rating};
pub use history::{HistoryAction, HistoryEntry};
pub use ids::{AgentId, ProjectId, TaskId};
pub use metrics::{AgentTaskMetrics, MetricsWindow, SETTLED_STATUSES};
pub(crate) use metrics::ratio;
pub use output::{Confidence, ExecutionRecord, TaskOutput};
pub use routing::ConfidenceThresholds;
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskInput, TaskMetadata};
