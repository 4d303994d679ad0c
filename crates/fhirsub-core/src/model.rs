//! The hierarchical typing record: one subject owning specimens, each
//! specimen owning molecular-typing observations.
//!
//! The tree is a read-only input. Assigned references are never written
//! back into it; they live in a [`crate::reference::RefTable`] side table
//! populated during submission.

use serde::{Deserialize, Serialize};

/// Field separator of the exchange schema, used both in rendered
/// identifier values and as the genotype correlation-key delimiter.
pub const FIELD_SEPARATOR: char = '*';

/// A system/value identifier pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub system: String,
    pub value: String,
}

impl Identifier {
    pub fn new(system: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            value: value.into(),
        }
    }

    /// Result-graph key format: `{system}_{value}`.
    pub fn composite_key(&self) -> String {
        format!("{}_{}", self.system, self.value)
    }

    /// Value rendered into `identifier.value` fields: `{system}*{value}`.
    pub fn display_value(&self) -> String {
        format!("{}{}{}", self.system, FIELD_SEPARATOR, self.value)
    }
}

/// One clinical record root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub identifier: Identifier,
    #[serde(default)]
    pub specimens: Vec<Specimen>,
}

/// A specimen belonging to exactly one subject. Exactly one specimen
/// yields exactly one derived diagnostic report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specimen {
    pub identifier: Identifier,
    #[serde(default)]
    pub observations: Vec<Observation>,
}

/// A molecular-typing observation belonging to exactly one specimen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub identifier: Identifier,
    /// Genotype-bearing typing string (GL string), e.g. `A*01:01/A*01:02`.
    pub glstring: String,
}
