//! Template identity, records, and compiled templates.

use super::{PromptError, filters};
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Version used when the caller names neither a version nor an experiment.
pub const DEFAULT_VERSION: &str = "default";
/// Version of the agent-wide fallback template.
pub const SYSTEM_VERSION: &str = "system";
/// Version of the built-in last-resort template.
pub const BASIC_VERSION: &str = "basic";

/// Identifies one template: an agent type, an optional task type, and a
/// version.
///
/// Agent-wide templates (the `system` fallback and the built-in `basic`
/// template) carry no task type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateKey {
    /// Agent the template is written for.
    pub agent_type: String,
    /// Task type the template covers; `None` for agent-wide templates.
    pub task_type: Option<String>,
    /// Template version.
    pub version: String,
}

impl TemplateKey {
    /// Creates a key for a task-specific template.
    #[must_use]
    pub fn new(
        agent_type: impl Into<String>,
        task_type: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            agent_type: agent_type.into(),
            task_type: Some(task_type.into()),
            version: version.into(),
        }
    }

    /// Creates the key of an agent's `system` fallback template.
    #[must_use]
    pub fn system(agent_type: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            task_type: None,
            version: SYSTEM_VERSION.to_owned(),
        }
    }

    /// Creates the key of an agent's built-in `basic` template.
    #[must_use]
    pub fn basic(agent_type: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            task_type: None,
            version: BASIC_VERSION.to_owned(),
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.agent_type,
            self.task_type.as_deref().unwrap_or("*"),
            self.version
        )
    }
}

/// Uncompiled template as stored by a template source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    /// Template identity.
    pub key: TemplateKey,
    /// Template body in minijinja syntax.
    pub body: String,
    /// Metadata merged into the render context.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl TemplateRecord {
    /// Creates a record without metadata.
    #[must_use]
    pub fn new(key: TemplateKey, body: impl Into<String>) -> Self {
        Self {
            key,
            body: body.into(),
            metadata: Map::new(),
        }
    }

    /// Replaces the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Builds the last-resort template for `agent_type`.
    ///
    /// The body has a single `prompt` placeholder; the agent type is written
    /// into the text with template delimiters stripped.
    #[must_use]
    pub fn basic(agent_type: &str) -> Self {
        let label: String = agent_type
            .chars()
            .filter(|ch| !matches!(ch, '{' | '}' | '%' | '#'))
            .collect();
        Self::new(
            TemplateKey::basic(agent_type),
            format!("You are the {label} agent. Complete the following task.\n\n{{{{ prompt }}}}"),
        )
    }
}

/// A template compiled and ready to render.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    key: TemplateKey,
    metadata: Map<String, Value>,
    environment: Environment<'static>,
}

impl PromptTemplate {
    /// Compiles a record, registering the formatting filters.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Compile`] when the body is not valid template
    /// syntax.
    pub fn compile(record: TemplateRecord) -> Result<Self, PromptError> {
        let TemplateRecord {
            key,
            body,
            metadata,
        } = record;
        let mut environment = Environment::new();
        filters::register(&mut environment);
        environment
            .add_template_owned(key.to_string(), body)
            .map_err(|err| PromptError::Compile {
                key: key.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self {
            key,
            metadata,
            environment,
        })
    }

    /// Returns the template key.
    #[must_use]
    pub const fn key(&self) -> &TemplateKey {
        &self.key
    }

    /// Returns the template metadata.
    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Renders the template against `context`.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Render`] when evaluation fails.
    pub fn render(&self, context: &Map<String, Value>) -> Result<String, PromptError> {
        let name = self.key.to_string();
        let render_error = |err: minijinja::Error| PromptError::Render {
            key: name.clone(),
            reason: err.to_string(),
        };
        self.environment
            .get_template(&name)
            .map_err(render_error)?
            .render(context)
            .map_err(render_error)
    }
}
