//! Adapter implementations for agent ports.

mod lifecycle;
pub mod memory;

pub use memory::{DEFAULT_RESPONSE_TTL_SECS, InMemoryResponseCache};
