//! Formatting filters available to every template.

use minijinja::{Environment, Error, Value};

/// Registers `bullets` and `numbered` on `environment`.
pub(crate) fn register(environment: &mut Environment<'static>) {
    environment.add_filter("bullets", bullets);
    environment.add_filter("numbered", numbered);
}

/// Renders a sequence as one `- item` per line.
fn bullets(items: &Value) -> Result<String, Error> {
    Ok(items
        .try_iter()?
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Renders a sequence as `1. item` lines.
fn numbered(items: &Value) -> Result<String, Error> {
    Ok(items
        .try_iter()?
        .enumerate()
        .map(|(index, item)| format!("{}. {item}", index.saturating_add(1)))
        .collect::<Vec<_>>()
        .join("\n"))
}
