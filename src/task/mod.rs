//! Task lifecycle management for Atelier.
//!
//! Tasks are created from validated drafts, routed by the confidence of the
//! output an agent attaches, and finalized or corrected by human review. A
//! rejected result with correction instructions spawns a child task one
//! priority step above its parent, forming a correction chain that can be
//! walked back for its review history. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Validation rules in [`validation`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
pub(crate) mod tests;
