//! Review-history snapshots.

use serde::{Deserialize, Serialize};

use crate::Time;

/// One past review round of the committed suite file.
///
/// Snapshots are collected by external review plumbing. Each round carries
/// the suite content as it was reviewed and whether the round was accepted
/// (merged); the gate's history channel aggregates them into per-check
/// acceptance rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteRevision {
    /// Review round number.
    pub number: u64,

    /// When the round was opened.
    pub created_at: Time,

    /// Whether the round was accepted.
    pub merged: bool,

    /// Suite file content as of the round.
    pub content: String,
}
