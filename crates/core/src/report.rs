//! Validation report model and result extraction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::CheckId;

/// Raw validation report produced by the sandbox run of a generated suite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Per-expectation outcomes.
    #[serde(default)]
    pub results: Vec<ReportedResult>,
}

/// One executed expectation inside a validation report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportedResult {
    /// Expectation configuration echoed back by the validation framework.
    #[serde(default)]
    pub expectation_config: ExpectationConfig,

    /// Whether the expectation held on the sampled data.
    #[serde(default)]
    pub success: bool,

    /// Framework-specific result payload. `unexpected_percent` is the
    /// deviation signal gating consumes.
    #[serde(default)]
    pub result: Map<String, Value>,
}

/// Expectation configuration embedded in a report entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpectationConfig {
    /// Expectation type name.
    #[serde(rename = "type", default)]
    pub expectation_type: String,

    /// Metadata attached at suite-generation time; carries the check_id tag.
    #[serde(default)]
    pub meta: Map<String, Value>,

    /// Expectation arguments; `column` identifies the target column.
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

/// Normalized outcome of one executed check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check the result belongs to.
    pub check_id: CheckId,

    /// Whether the check passed.
    pub success: bool,

    /// Expectation type that implemented the check.
    pub expectation_type: String,

    /// Column the expectation ran against, when column-scoped.
    pub column: Option<String>,

    /// Raw result payload.
    pub result: Map<String, Value>,
}

impl CheckResult {
    /// The `unexpected_percent` deviation metric, if the framework reported
    /// a numeric one.
    pub fn unexpected_percent(&self) -> Option<f64> {
        self.result.get("unexpected_percent").and_then(Value::as_f64)
    }
}

/// Extraction output: normalized results plus a count of report entries that
/// could not be reconciled.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Reconcilable results.
    pub results: Vec<CheckResult>,

    /// Entries dropped because they carried no check_id tag.
    pub dropped: usize,
}

impl ValidationReport {
    /// Flatten the report into normalized per-check results.
    ///
    /// Entries whose metadata lacks a check_id tag cannot be reconciled;
    /// they are dropped and counted rather than silently ignored.
    pub fn extract(&self) -> Extraction {
        let mut extraction = Extraction::default();
        for entry in &self.results {
            let cfg = &entry.expectation_config;
            let check_id = cfg
                .meta
                .get("check_id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty());
            let Some(check_id) = check_id else {
                extraction.dropped += 1;
                continue;
            };
            extraction.results.push(CheckResult {
                check_id: CheckId::new(check_id),
                success: entry.success,
                expectation_type: cfg.expectation_type.clone(),
                column: cfg
                    .kwargs
                    .get("column")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                result: entry.result.clone(),
            });
        }
        extraction
    }
}
