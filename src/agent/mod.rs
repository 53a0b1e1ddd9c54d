//! Agent contract and shared execution pipeline.
//!
//! Workers implement [`services::Worker`] and delegate the mechanics of a
//! model call to [`services::AgentCore`]: response cache probe, model
//! selection, invocation, measurement, cache write-back, and running
//! counters. Errors stop at the worker boundary, where they become failed
//! results and the task is moved to `failed` through the lifecycle manager.
//! [`services::AgentRegistry`] routes tasks to workers by target agent.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
