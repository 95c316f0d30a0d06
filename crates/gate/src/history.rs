//! Historical acceptance rates from past suite reviews.

use std::collections::BTreeMap;

use dataqa_core::{CheckId, SuiteRevision, Time};

/// Review rounds required before an acceptance rate is trusted.
const MIN_OBSERVATIONS: usize = 2;

/// `check_id": "<id>"` tags inside reviewed suite content.
const CHECK_ID_PATTERN: &str = r#"check_id"\s*:\s*"([^"]+)""#;

/// Source of historical acceptance rates for gating.
///
/// `None` means the lookup has no trustworthy signal for the id; the gate
/// substitutes its neutral prior. Implementations must never derive rates
/// from prior gate decisions — history comes from human review outcomes.
pub trait HistoryLookup {
    /// Acceptance rate in [0, 1] for a check id, when enough history exists.
    fn acceptance_rate(&self, check_id: &CheckId) -> Option<f64>;
}

/// Lookup with no historical data at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralHistory;

impl HistoryLookup for NeutralHistory {
    fn acceptance_rate(&self, _check_id: &CheckId) -> Option<f64> {
        None
    }
}

/// Per-check review counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptanceStats {
    /// Review rounds that touched the check.
    pub total: usize,

    /// Rounds that were accepted.
    pub accepted: usize,
}

impl AcceptanceStats {
    /// Fraction of rounds that were accepted.
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.accepted as f64 / self.total as f64
        }
    }
}

/// Acceptance rates aggregated from past suite revisions.
#[derive(Debug, Clone, Default)]
pub struct AcceptanceIndex {
    stats: BTreeMap<CheckId, AcceptanceStats>,
}

impl AcceptanceIndex {
    /// Aggregate revisions opened at or after `cutoff` into per-check
    /// counts. Every check id tagged in a revision's content counts one
    /// round, accepted when the revision was merged.
    pub fn from_revisions(revisions: &[SuiteRevision], cutoff: Time) -> Self {
        let mut stats: BTreeMap<CheckId, AcceptanceStats> = BTreeMap::new();
        for revision in revisions {
            if revision.created_at < cutoff {
                continue;
            }
            for check_id in extract_check_ids(&revision.content) {
                let entry = stats.entry(check_id).or_default();
                entry.total += 1;
                if revision.merged {
                    entry.accepted += 1;
                }
            }
        }
        Self { stats }
    }

    /// Raw counts for a check id.
    pub fn stats(&self, check_id: &CheckId) -> Option<AcceptanceStats> {
        self.stats.get(check_id).copied()
    }
}

impl HistoryLookup for AcceptanceIndex {
    fn acceptance_rate(&self, check_id: &CheckId) -> Option<f64> {
        // A single observation is not enough to trust the rate.
        self.stats
            .get(check_id)
            .filter(|stats| stats.total >= MIN_OBSERVATIONS)
            .map(AcceptanceStats::rate)
    }
}

/// Pull check_id tags out of reviewed suite content.
pub fn extract_check_ids(content: &str) -> Vec<CheckId> {
    let Ok(re) = regex::Regex::new(CHECK_ID_PATTERN) else {
        return Vec::new();
    };
    re.captures_iter(content)
        .map(|caps| CheckId::from(&caps[1]))
        .collect()
}
