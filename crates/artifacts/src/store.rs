//! Artifact store abstraction.

use async_trait::async_trait;
use dataqa_core::{
    Contract, ContractParseError, CoverageSummary, DecisionSet, MalformedProposalError, Proposal,
    RunRef, SuiteRevision, ValidationReport,
};

/// Error type for artifact operations.
pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Errors that can occur while reading or writing pipeline artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A mandatory artifact is absent
    #[error("missing artifact: {path}")]
    Missing {
        /// Path of the absent artifact.
        path: std::path::PathBuf,
    },

    /// The contract parsed but its rule catalog is unusable
    #[error(transparent)]
    Contract(#[from] ContractParseError),

    /// A proposal record is unusable
    #[error(transparent)]
    Proposal(#[from] MalformedProposalError),
}

/// Store for the artifacts one pipeline run reads and writes.
///
/// Implementations own naming and placement; callers address artifacts only
/// through a dataset name or a [`RunRef`]. Writes must be atomic so a failed
/// run never leaves a partial decision or coverage file behind.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Load a dataset's data contract. The contract is mandatory; a missing
    /// file is an error.
    async fn load_contract(&self, dataset: &str) -> Result<Contract>;

    /// Load a run's proposals. Proposals are mandatory: neither coverage nor
    /// gating means anything without them.
    async fn load_proposals(&self, run: &RunRef) -> Result<Vec<Proposal>>;

    /// Load a run's validation report, or `None` when the run has not been
    /// executed yet.
    async fn load_report(&self, run: &RunRef) -> Result<Option<ValidationReport>>;

    /// Load a dataset's review-history snapshot, or `None` when none has
    /// been collected.
    async fn load_revisions(&self, dataset: &str) -> Result<Option<Vec<SuiteRevision>>>;

    /// Persist a run's decisions. One decision file per run id; rerunning a
    /// run id with identical inputs rewrites identical bytes.
    async fn save_decisions(&self, run: &RunRef, decisions: &DecisionSet) -> Result<()>;

    /// Load a run's persisted decisions, or `None` when the run has not been
    /// gated yet.
    async fn load_decisions(&self, run: &RunRef) -> Result<Option<DecisionSet>>;

    /// Persist a run's coverage report as a JSON and CSV pair.
    async fn save_coverage(&self, run: &RunRef, summary: &CoverageSummary) -> Result<()>;
}
