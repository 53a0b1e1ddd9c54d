//! Render context assembly.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Inputs for the keys every render context carries.
pub(super) struct DefaultContext<'a> {
    pub(super) now: DateTime<Utc>,
    pub(super) product_name: &'a str,
    pub(super) environment: &'a str,
    pub(super) agent_type: &'a str,
    pub(super) task_type: &'a str,
}

/// Merges defaults, template metadata, and caller values, later layers
/// winning on collision.
pub(super) fn merge(
    defaults: &DefaultContext<'_>,
    metadata: &Map<String, Value>,
    caller: &Map<String, Value>,
) -> Map<String, Value> {
    let mut context = Map::new();
    context.insert(
        "date".to_owned(),
        Value::String(defaults.now.format("%Y-%m-%d").to_string()),
    );
    context.insert(
        "timestamp".to_owned(),
        Value::String(defaults.now.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );
    context.insert(
        "product_name".to_owned(),
        Value::String(defaults.product_name.to_owned()),
    );
    context.insert(
        "environment".to_owned(),
        Value::String(defaults.environment.to_owned()),
    );
    context.insert(
        "agent_type".to_owned(),
        Value::String(defaults.agent_type.to_owned()),
    );
    context.insert(
        "task_type".to_owned(),
        Value::String(defaults.task_type.to_owned()),
    );
    context.extend(metadata.iter().map(|(key, value)| (key.clone(), value.clone())));
    context.extend(caller.iter().map(|(key, value)| (key.clone(), value.clone())));
    context
}

/// Average characters per token used for estimates.
pub(super) const CHARS_PER_TOKEN: usize = 4;

/// Approximates the token count of `text`.
pub(super) fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}
