//! Port contracts for prompt resolution.

pub mod source;

pub use source::{PromptSourceError, PromptSourceResult, PromptTemplateSource};
