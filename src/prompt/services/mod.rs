//! Application services for prompt resolution.

mod config;
mod context;
mod engine;

pub use config::PromptEngineConfig;
pub use engine::{PromptEngine, RenderOptions, RenderedPrompt};
