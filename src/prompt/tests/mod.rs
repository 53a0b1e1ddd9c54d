//! Unit tests for prompt resolution.
