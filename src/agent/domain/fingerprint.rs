//! Response cache fingerprints.

use crate::task::domain::AgentId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest identifying an `(agent, prompt, context)` triple.
///
/// Context keys are serialized in sorted order, so equal contexts built in
/// different insertion orders share a fingerprint.
///
/// # Examples
///
/// ```
/// use atelier::agent::domain::Fingerprint;
/// use atelier::task::domain::AgentId;
/// use serde_json::Map;
///
/// let agent = AgentId::new("qa_tester").expect("valid agent");
/// let first = Fingerprint::compute(&agent, "check login", &Map::new());
/// let second = Fingerprint::compute(&agent, "check login", &Map::new());
/// assert_eq!(first, second);
/// assert_eq!(first.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes the fingerprint of a call.
    #[must_use]
    pub fn compute(agent: &AgentId, prompt: &str, context: &Map<String, Value>) -> Self {
        let canonical = json!({
            "agent": agent.as_str(),
            "prompt": prompt,
            "context": context,
        })
        .to_string();
        let digest = Sha256::digest(canonical.as_bytes());
        Self(format!("{digest:x}"))
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
