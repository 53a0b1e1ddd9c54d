//! Domain model for agent execution.
//!
//! Covers the worker contract violations, model request and response
//! payloads, response fingerprints, running agent metrics, and the
//! results workers hand back to callers.

mod error;
mod fingerprint;
mod metrics;
mod model;
mod result;

pub use error::{AgentError, PipelineStage, TaskContractViolation};
pub use fingerprint::Fingerprint;
pub use metrics::{AgentMetricsSnapshot, AgentRunMetrics};
pub use model::{ExecutionOptions, ModelRequest, ModelResponse, SelectionRequest};
pub use result::{AgentResult, AiExecution};
