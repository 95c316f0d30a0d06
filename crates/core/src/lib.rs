//! DataQA core data models.
//!
//! This crate defines the artifact shapes exchanged between the proposal,
//! validation, and gating stages of the pipeline.

#![warn(missing_docs)]

// Identifiers
mod id;

// Pipeline artifacts
mod contract;
mod proposal;
mod report;
mod decision;
mod coverage;
mod review;

// Re-exports
pub use id::{CheckId, RunRef};

pub use contract::{Contract, ContractParseError, QualityRule, SchemaEntry};
pub use proposal::{
    parse_proposal, parse_proposals, proposal_records, CheckType, MalformedProposalError, Origin,
    Proposal,
};
pub use report::{CheckResult, ExpectationConfig, Extraction, ReportedResult, ValidationReport};
pub use decision::{Decision, DecisionSet};
pub use coverage::{CoverageRow, CoverageStat, CoverageSummary};
pub use review::SuiteRevision;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
