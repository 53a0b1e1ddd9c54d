//! Port contracts for agent execution.
//!
//! Model access, response caching, and lifecycle coordination are kept
//! behind traits so workers can be exercised without real providers.

pub mod cache;
pub mod coordinator;
pub mod model;

pub use cache::{CachedResponse, ResponseCache, ResponseCacheError, ResponseCacheResult};
pub use coordinator::TaskCoordinator;
pub use model::{
    ModelInvocationError, ModelInvocationResult, ModelInvoker, ModelSelectionError,
    ModelSelectionResult, ModelSelector,
};

#[cfg(test)]
pub use model::{MockModelInvoker, MockModelSelector};
