//! In-memory adapters for tests and single-process deployments.

mod events;
mod task;

pub use events::InMemoryEventBus;
pub use task::InMemoryTaskRepository;
