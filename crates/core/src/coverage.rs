//! Coverage report model.

use serde::{Deserialize, Serialize};

use crate::CheckId;

/// Covered-rule count against the contract total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageStat {
    /// Rules with at least one associated id.
    pub covered: usize,

    /// Rules declared in the contract.
    pub total: usize,

    /// covered / total; 1.0 for an empty catalog.
    pub pct: f64,
}

/// One audit-table row: a contract rule and everything tied to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRow {
    /// Rule name.
    pub rule: String,

    /// Proposal ids referencing the rule, in proposal order.
    pub proposals: Vec<CheckId>,

    /// Executed check ids that map back to the rule.
    pub expectations: Vec<CheckId>,
}

/// Per-run coverage report.
///
/// Derived from the rule catalog, proposals, and execution results; it is
/// recomputed each run, never stored as a primary entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Dataset the run operates on.
    pub dataset: String,

    /// Run the report describes.
    pub run_id: String,

    /// Rules covered by at least one proposal.
    pub proposal_coverage: CoverageStat,

    /// Rules covered by at least one executed check.
    pub expectation_coverage: CoverageStat,

    /// One row per contract rule, sorted by rule name.
    pub table: Vec<CoverageRow>,

    /// Executed check ids matching no known proposal. Orphans signal a
    /// code/data mismatch and are surfaced, never dropped.
    pub unmapped_existing: Vec<CheckId>,

    /// Executed check ids matching a proposal that is tied to no contract
    /// rule (profile-derived checks that still ran).
    pub proposal_only_existing: Vec<CheckId>,
}
