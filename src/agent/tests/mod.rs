//! Unit tests for the agent pipeline, workers, and registry.

mod registry_tests;
mod support;
