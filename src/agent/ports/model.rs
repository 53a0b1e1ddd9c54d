//! Model selection and invocation ports.

use crate::agent::domain::{ModelRequest, ModelResponse, SelectionRequest};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for model invocation.
pub type ModelInvocationResult<T> = Result<T, ModelInvocationError>;

/// Result type for model selection.
pub type ModelSelectionResult<T> = Result<T, ModelSelectionError>;

/// Invokes a model and returns its structured response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Sends the prompt to the requested model.
    async fn invoke(&self, request: &ModelRequest) -> ModelInvocationResult<ModelResponse>;
}

/// Picks a model for a call, typically optimizing for cost.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelSelector: Send + Sync {
    /// Returns the model identifier to invoke.
    async fn select_model(&self, request: &SelectionRequest) -> ModelSelectionResult<String>;
}

/// Errors returned by model invokers.
#[derive(Debug, Clone, Error)]
pub enum ModelInvocationError {
    /// The model is unknown to the invoker.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// The provider refused or failed the request.
    #[error("model provider error: {0}")]
    Provider(String),

    /// Transport or runtime failure.
    #[error("model runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl ModelInvocationError {
    /// Wraps a runtime error from the invoker.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}

/// Errors returned by model selectors.
#[derive(Debug, Clone, Error)]
pub enum ModelSelectionError {
    /// No model satisfies the request.
    #[error("no model available for agent {0}")]
    NoCandidate(String),

    /// Selector runtime failure.
    #[error("model selection error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl ModelSelectionError {
    /// Wraps a runtime error from the selector.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
