//! Reference tokens and the side table of assigned references.
//!
//! A [`Reference`] points one resource at another. It is either
//! server-assigned (extracted from a submission response, with a display
//! URL) or client-generated (a fresh `urn:uuid:` token for offline
//! bundling). The [`RefTable`] records which reference each node of the
//! input tree has been assigned, keyed by the node's composite identifier,
//! so the tree itself stays immutable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// URN convention prefix for client-generated reference tokens.
pub const URN_PREFIX: &str = "urn:uuid:";

/// An opaque reference token plus, for server-assigned references, a
/// display URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            display: None,
        }
    }

    pub fn with_display(reference: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            display: Some(display.into()),
        }
    }

    /// Generates a fresh client-side reference token (`urn:uuid:{v4}`).
    pub fn urn() -> Self {
        Self::new(format!("{URN_PREFIX}{}", uuid::Uuid::new_v4()))
    }

    /// Extracts the server-assigned reference from a submission response
    /// body carrying `resourceType` and `id`.
    pub fn from_response(body: &Value, base_url: &str) -> Result<Self> {
        let resource_type = body
            .get("resourceType")
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::response_extraction("response body has no resourceType"))?;
        let id = body
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| CoreError::response_extraction("response body has no id"))?;
        let base = base_url.trim_end_matches('/');
        Ok(Self::with_display(
            format!("{resource_type}/{id}"),
            format!("{base}/{resource_type}/{id}"),
        ))
    }

    /// The generated-id portion of a client-side token, if this is one.
    pub fn generated_id(&self) -> Option<&str> {
        self.reference.strip_prefix(URN_PREFIX)
    }
}

/// Side table of assigned references, keyed by node composite identifier.
///
/// Populated by the submission orchestrator and consulted by renderers via
/// the render context; the input tree is never mutated.
#[derive(Debug, Default)]
pub struct RefTable {
    subject: Option<Reference>,
    specimens: HashMap<String, Reference>,
    results: HashMap<String, Reference>,
}

impl RefTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_subject(&mut self, reference: Reference) {
        self.subject = Some(reference);
    }

    pub fn subject(&self) -> Option<&Reference> {
        self.subject.as_ref()
    }

    pub fn set_specimen(&mut self, key: impl Into<String>, reference: Reference) {
        self.specimens.insert(key.into(), reference);
    }

    pub fn specimen(&self, key: &str) -> Option<&Reference> {
        self.specimens.get(key)
    }

    /// Records an observation's own assigned reference as its result value.
    pub fn set_result(&mut self, key: impl Into<String>, reference: Reference) {
        self.results.insert(key.into(), reference);
    }

    pub fn result(&self, key: &str) -> Option<&Reference> {
        self.results.get(key)
    }
}
