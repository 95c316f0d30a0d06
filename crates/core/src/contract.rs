//! Data contract model and rule catalog.

use serde::{Deserialize, Serialize};

/// Errors raised while reading the rule catalog out of a contract.
#[derive(Debug, thiserror::Error)]
pub enum ContractParseError {
    /// The contract declares no schema entries.
    #[error("contract declares no schema entries")]
    NoSchemaEntries,
}

/// Parsed data contract.
///
/// Only the pieces the engine consumes are modeled; unknown fields in the
/// contract document are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    /// Schema entries; the first one governs the dataset under test.
    pub schema: Vec<SchemaEntry>,
}

/// One schema entry of a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaEntry {
    /// Declared quality rules, in contract order.
    #[serde(default)]
    pub quality: Vec<QualityRule>,
}

/// A named data-quality obligation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityRule {
    /// Rule name, unique within the contract.
    pub rule: String,
}

impl Contract {
    /// Ordered names of the rules declared under the primary schema entry.
    ///
    /// The order is the declaration order in the contract; reports key off it
    /// deterministically.
    pub fn rule_names(&self) -> Result<Vec<String>, ContractParseError> {
        let entry = self
            .schema
            .first()
            .ok_or(ContractParseError::NoSchemaEntries)?;
        Ok(entry.quality.iter().map(|q| q.rule.clone()).collect())
    }
}
