//! Error types for prompt resolution and rendering.

use crate::prompt::ports::PromptSourceError;
use thiserror::Error;

/// Errors raised by the prompt engine and compiled templates.
#[derive(Debug, Clone, Error)]
pub enum PromptError {
    /// The template source failed.
    #[error(transparent)]
    Source(#[from] PromptSourceError),

    /// A template body is not valid template syntax.
    #[error("template {key} failed to compile: {reason}")]
    Compile {
        /// Template key.
        key: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A template failed while rendering.
    #[error("template {key} failed to render: {reason}")]
    Render {
        /// Template key.
        key: String,
        /// Renderer diagnostic.
        reason: String,
    },

    /// An engine cache lock was poisoned.
    #[error("prompt cache is unavailable: {0}")]
    CacheUnavailable(String),
}
