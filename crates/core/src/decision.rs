//! Gate decisions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::CheckId;

/// Outcome of gating a single check within one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Proposer's predicted probability that the check holds.
    pub likelihood: f64,

    /// Normalized deviation observed when the check ran; 1.0 when it never
    /// ran.
    pub evidence: f64,

    /// Historical acceptance rate for this check id.
    pub history: f64,

    /// Weighted combination of likelihood, evidence, and history.
    pub confidence: f64,

    /// Whether the check is promoted into the committed suite.
    pub go: bool,
}

/// Decisions for one run, keyed by check id.
///
/// Sorted keys keep serialization deterministic: regating a run with the
/// same inputs reproduces the decision artifact byte for byte.
pub type DecisionSet = BTreeMap<CheckId, Decision>;
