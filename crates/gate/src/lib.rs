//! Confidence gating.
//!
//! Scores every check proposal of a run from predicted likelihood, observed
//! evidence, and historical acceptance, and decides which proposals are
//! promoted into the committed checking suite.

#![warn(missing_docs)]

pub mod gate;
pub mod history;

pub use gate::{
    gate, promote, GateConfig, GateError, GateOutcome, EVIDENCE_WEIGHT, HISTORY_WEIGHT,
    LIKELIHOOD_WEIGHT, NEUTRAL_HISTORY,
};
pub use history::{
    extract_check_ids, AcceptanceIndex, AcceptanceStats, HistoryLookup, NeutralHistory,
};
