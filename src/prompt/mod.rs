//! Prompt resolution with layered fallback and weighted experiments.
//!
//! A render resolves a template version (fixed or drawn from a weighted
//! experiment), loads and compiles it through a [`ports::PromptTemplateSource`],
//! and falls back to the agent's `system` template and then to a built-in
//! template so that rendering never fails for want of a record. Usage and
//! outcome counters are kept per rendered version for comparing experiment
//! arms.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
