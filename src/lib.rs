//! Atelier: task lifecycle, agent execution, and prompt resolution for
//! AI-backed workers.
//!
//! Tasks flow from a requester agent to a target agent. The target's worker
//! renders a prompt, runs it through a shared model pipeline, and reports
//! output whose confidence decides whether the task completes, fails, or
//! waits for human review. Rejected work spawns correction tasks linked to
//! the original.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory stores,
//!   template directories)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`task`]: Task creation, confidence routing, and the human feedback loop
//! - [`agent`]: Worker contract, execution pipeline, and dispatch
//! - [`prompt`]: Template resolution with fallback, experiments, and usage
//!   metrics
//! - [`cache`]: Bounded LRU/TTL cache shared by the engines
//! - [`config`]: JSON-loadable configuration for every context

pub mod agent;
pub mod cache;
pub mod config;
pub mod prompt;
pub mod task;
