//! Identifiers for pipeline artifacts.

use serde::{Deserialize, Serialize};

/// Identifier of a proposed or executed check.
///
/// Check ids are supplied by the proposer, or derived from proposal content
/// when the proposer omitted one. The engine never generates them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckId(String);

impl CheckId {
    /// Wrap a raw id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CheckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for CheckId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CheckId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Dataset and run identifier pair that namespaces every artifact of one
/// pipeline run.
///
/// Both values come from the caller. A run id must not be reused for a
/// second concurrent run of the same dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunRef {
    /// Dataset the run operates on.
    pub dataset: String,

    /// Identifier of this run.
    pub run_id: String,
}

impl RunRef {
    /// Create a run reference.
    pub fn new(dataset: impl Into<String>, run_id: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            run_id: run_id.into(),
        }
    }
}

impl std::fmt::Display for RunRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.dataset, self.run_id)
    }
}
