//! Template source reading `<agent>/<task>/<version>.j2` files from a
//! directory tree.
//!
//! Agent-wide templates live directly under the agent directory as
//! `<agent>/<version>.j2`. A `<version>.json` file next to a template holds
//! its metadata object.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::sync::Arc;

use crate::prompt::{
    domain::{TemplateKey, TemplateRecord},
    ports::{PromptSourceError, PromptSourceResult, PromptTemplateSource},
};

const TEMPLATE_EXTENSION: &str = "j2";
const METADATA_EXTENSION: &str = "json";

/// Template source confined to one directory.
#[derive(Debug, Clone)]
pub struct DirectoryTemplateSource {
    root: Arc<Dir>,
}

impl DirectoryTemplateSource {
    /// Opens `path` as the template root.
    ///
    /// # Errors
    ///
    /// Returns [`PromptSourceError::Storage`] when the directory cannot be
    /// opened.
    pub fn open(path: &Utf8Path) -> PromptSourceResult<Self> {
        let root = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(PromptSourceError::storage)?;
        Ok(Self::from_dir(root))
    }

    /// Wraps an already opened directory handle.
    #[must_use]
    pub fn from_dir(root: Dir) -> Self {
        Self {
            root: Arc::new(root),
        }
    }
}

#[async_trait]
impl PromptTemplateSource for DirectoryTemplateSource {
    async fn load(&self, key: &TemplateKey) -> PromptSourceResult<Option<TemplateRecord>> {
        let location = TemplateLocation::for_key(key)?;
        let root = Arc::clone(&self.root);
        let owned_key = key.clone();
        tokio::task::spawn_blocking(move || read_record(&root, &location, owned_key))
            .await
            .map_err(PromptSourceError::storage)?
    }
}

struct TemplateLocation {
    directory: Utf8PathBuf,
    version: String,
}

impl TemplateLocation {
    fn for_key(key: &TemplateKey) -> PromptSourceResult<Self> {
        let mut directory = Utf8PathBuf::from(checked_component(&key.agent_type)?);
        if let Some(task_type) = &key.task_type {
            directory.push(checked_component(task_type)?);
        }
        Ok(Self {
            directory,
            version: checked_component(&key.version)?.to_owned(),
        })
    }

    fn file(&self, extension: &str) -> Utf8PathBuf {
        self.directory.join(format!("{}.{extension}", self.version))
    }
}

fn checked_component(component: &str) -> PromptSourceResult<&str> {
    let valid = !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains(['/', '\\']);
    if valid {
        Ok(component)
    } else {
        Err(PromptSourceError::InvalidKey(component.to_owned()))
    }
}

fn read_record(
    root: &Dir,
    location: &TemplateLocation,
    key: TemplateKey,
) -> PromptSourceResult<Option<TemplateRecord>> {
    let Some(body) = read_optional(root, &location.file(TEMPLATE_EXTENSION))? else {
        return Ok(None);
    };
    let metadata = match read_optional(root, &location.file(METADATA_EXTENSION))? {
        Some(raw) => parse_metadata(&key, &raw)?,
        None => Map::new(),
    };
    Ok(Some(TemplateRecord::new(key, body).with_metadata(metadata)))
}

fn read_optional(root: &Dir, path: &Utf8Path) -> PromptSourceResult<Option<String>> {
    match root.read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(PromptSourceError::storage(err)),
    }
}

fn parse_metadata(key: &TemplateKey, raw: &str) -> PromptSourceResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(metadata)) => Ok(metadata),
        Ok(_) => Err(PromptSourceError::InvalidMetadata {
            key: key.to_string(),
            reason: "metadata must be a JSON object".to_owned(),
        }),
        Err(err) => Err(PromptSourceError::InvalidMetadata {
            key: key.to_string(),
            reason: err.to_string(),
        }),
    }
}
