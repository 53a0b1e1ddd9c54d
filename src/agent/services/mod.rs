//! Agent services: the shared pipeline, the worker contract, a
//! prompt-driven worker, and the registry that dispatches tasks.

mod config;
mod pipeline;
mod registry;
mod template_worker;
mod worker;

pub use config::{DEFAULT_MODEL, PipelineConfig};
pub use pipeline::{AgentCore, PARENT_TASK_CONTEXT_KEY};
pub use registry::AgentRegistry;
pub use template_worker::{DEFAULT_TASK_TYPE, TASK_TYPE_CONTEXT_KEY, TemplateWorker};
pub use worker::Worker;
