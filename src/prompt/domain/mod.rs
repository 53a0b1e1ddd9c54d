//! Domain model for prompt resolution.
//!
//! Templates are identified by agent type, task type, and version. Weighted
//! experiments pick a version per render, and usage counters record how each
//! rendered version performs.

mod error;
mod experiment;
pub(crate) mod filters;
mod template;
mod usage;

pub use error::PromptError;
pub use experiment::{Experiment, ExperimentVariant};
pub use template::{
    BASIC_VERSION, DEFAULT_VERSION, PromptTemplate, SYSTEM_VERSION, TemplateKey, TemplateRecord,
};
pub use usage::{ExecutionOutcome, PromptVersionMetrics, UsageKey, UsageMetric};
