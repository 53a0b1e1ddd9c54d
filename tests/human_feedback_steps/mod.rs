//! Step definitions for human feedback scenarios.

pub mod world;

mod given;
mod then;
mod when;
