//! Application services for task lifecycle orchestration.

mod config;
mod feedback;
mod lifecycle;
mod queries;

pub use config::LifecycleConfig;
pub use feedback::{FeedbackRecord, ORIGINAL_REQUEST_CONTEXT_KEY};
pub use lifecycle::{
    RecordOutputRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
    TransitionTaskRequest,
};
