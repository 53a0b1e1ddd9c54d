//! Unit tests for the task lifecycle module.

pub(crate) mod support;
mod validation_tests;
