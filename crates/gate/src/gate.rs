//! Confidence scoring and promotion decisions.

use dataqa_core::{CheckId, CheckResult, Decision, DecisionSet, Proposal};

use crate::history::HistoryLookup;

/// Weight of the proposer's likelihood in the confidence score.
pub const LIKELIHOOD_WEIGHT: f64 = 0.4;

/// Weight of the observed evidence in the confidence score.
pub const EVIDENCE_WEIGHT: f64 = 0.4;

/// Weight of the historical acceptance rate in the confidence score.
pub const HISTORY_WEIGHT: f64 = 0.2;

/// Prior substituted when a check has no trustworthy history.
pub const NEUTRAL_HISTORY: f64 = 0.5;

/// Raw evidence assigned to a check that never executed.
const WORST_CASE_PERCENT: f64 = 100.0;

/// Gate configuration.
#[derive(Debug, Clone, Copy)]
pub struct GateConfig {
    /// Minimum confidence for a go decision.
    pub threshold: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

/// Errors raised when pairing proposals with decisions.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// A proposal has no decision in the set; the set belongs to a
    /// different run.
    #[error("no decision for check `{check_id}`")]
    MissingDecision {
        /// The unmatched check id.
        check_id: CheckId,
    },
}

/// Result of filtering proposals through their decisions.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Proposals whose decision came back go, in input order.
    Promoted(Vec<Proposal>),

    /// Nothing passed the gate. Downstream must treat this as "no changes"
    /// rather than emit an empty suite update.
    NoChanges,
}

/// Gate every proposal of a run into a go / no-go decision.
///
/// A pure function of its inputs: proposals and results are never mutated,
/// and identical inputs produce an identical decision set. Results are
/// matched by exact check id.
pub fn gate(
    proposals: &[Proposal],
    results: &[CheckResult],
    history: &dyn HistoryLookup,
    config: &GateConfig,
) -> DecisionSet {
    let mut decisions = DecisionSet::new();
    for proposal in proposals {
        let matched = results.iter().find(|r| r.check_id == proposal.check_id);
        let evidence = evidence(matched);
        let rate = history
            .acceptance_rate(&proposal.check_id)
            .unwrap_or(NEUTRAL_HISTORY);
        let confidence = LIKELIHOOD_WEIGHT * proposal.likelihood
            + EVIDENCE_WEIGHT * evidence
            + HISTORY_WEIGHT * rate;
        let go = confidence >= config.threshold;
        tracing::debug!(
            check_id = %proposal.check_id,
            likelihood = proposal.likelihood,
            evidence,
            history = rate,
            confidence,
            go,
            "gated check"
        );
        decisions.insert(
            proposal.check_id.clone(),
            Decision {
                likelihood: proposal.likelihood,
                evidence,
                history: rate,
                confidence,
                go,
            },
        );
    }
    decisions
}

/// Normalized evidence for a proposal's matching result.
///
/// A result without a numeric deviation field reads as no detected
/// violation. A missing result reads as the worst case: an un-executed
/// check stays maximally unproven.
fn evidence(matched: Option<&CheckResult>) -> f64 {
    let raw = match matched {
        Some(result) => result.unexpected_percent().unwrap_or(0.0),
        None => WORST_CASE_PERCENT,
    };
    raw / 100.0
}

/// Keep the proposals whose decision is a go.
pub fn promote(proposals: &[Proposal], decisions: &DecisionSet) -> Result<GateOutcome, GateError> {
    let mut promoted = Vec::new();
    for proposal in proposals {
        let decision = decisions
            .get(&proposal.check_id)
            .ok_or_else(|| GateError::MissingDecision {
                check_id: proposal.check_id.clone(),
            })?;
        if decision.go {
            promoted.push(proposal.clone());
        }
    }
    if promoted.is_empty() {
        Ok(GateOutcome::NoChanges)
    } else {
        Ok(GateOutcome::Promoted(promoted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{AcceptanceIndex, NeutralHistory};
    use dataqa_core::{parse_proposals, ValidationReport};
    use proptest::prelude::*;
    use serde_json::json;

    fn proposal(check_id: &str, likelihood: f64) -> Vec<Proposal> {
        parse_proposals(&json!([{
            "check_id": check_id,
            "type": "unique",
            "column": "order_id",
            "likelihood": likelihood,
            "origin": {"rule": "order_id_unique", "from_contract": true}
        }]))
        .unwrap()
    }

    fn result(check_id: &str, result: serde_json::Value) -> Vec<CheckResult> {
        let report: ValidationReport = serde_json::from_value(json!({"results": [{
            "expectation_config": {"type": "t", "meta": {"check_id": check_id}, "kwargs": {}},
            "success": true,
            "result": result
        }]}))
        .unwrap();
        report.extract().results
    }

    // Executed clean check: evidence 0, confidence 0.4*0.9 + 0.2*0.5 = 0.46.
    #[test]
    fn executed_clean_check_scores_point_four_six() {
        let proposals = proposal("orders:unique:order_id", 0.9);
        let results = result("orders:unique:order_id", json!({"unexpected_percent": 0}));

        let decisions = gate(
            &proposals,
            &results,
            &NeutralHistory,
            &GateConfig { threshold: 0.5 },
        );
        let decision = &decisions[&proposals[0].check_id];
        assert_eq!(decision.evidence, 0.0);
        assert_eq!(decision.history, 0.5);
        assert!((decision.confidence - 0.46).abs() < 1e-9);
        assert!(!decision.go);

        let relaxed = gate(
            &proposals,
            &results,
            &NeutralHistory,
            &GateConfig { threshold: 0.4 },
        );
        assert!(relaxed[&proposals[0].check_id].go);
    }

    // An un-executed check carries worst-case evidence and is promoted.
    // That default is intended: unproven checks stay in until reviewed.
    #[test]
    fn unexecuted_check_defaults_to_promotion() {
        let proposals = proposal("orders:unique:order_id", 0.9);

        let decisions = gate(&proposals, &[], &NeutralHistory, &GateConfig::default());
        let decision = &decisions[&proposals[0].check_id];
        assert_eq!(decision.evidence, 1.0);
        assert!((decision.confidence - 0.96).abs() < 1e-9);
        assert!(decision.go);
    }

    #[test]
    fn result_without_deviation_field_reads_as_clean() {
        let proposals = proposal("c", 0.0);
        let results = result("c", json!({}));

        let decisions = gate(&proposals, &results, &NeutralHistory, &GateConfig::default());
        assert_eq!(decisions[&proposals[0].check_id].evidence, 0.0);
    }

    #[test]
    fn deviation_percent_is_normalized() {
        let proposals = proposal("c", 0.0);
        let results = result("c", json!({"unexpected_percent": 12.5}));

        let decisions = gate(&proposals, &results, &NeutralHistory, &GateConfig::default());
        assert_eq!(decisions[&proposals[0].check_id].evidence, 0.125);
    }

    #[test]
    fn matching_is_by_exact_check_id() {
        let proposals = proposal("orders:unique:order_id", 0.0);
        // Same column substring, different id: must not match.
        let results = result("orders:unique:order_id_v2", json!({"unexpected_percent": 0}));

        let decisions = gate(&proposals, &results, &NeutralHistory, &GateConfig::default());
        assert_eq!(decisions[&proposals[0].check_id].evidence, 1.0);
    }

    #[test]
    fn history_rate_feeds_the_score() {
        let proposals = proposal("c", 0.5);
        let results = result("c", json!({"unexpected_percent": 0}));

        struct Fixed(f64);
        impl crate::history::HistoryLookup for Fixed {
            fn acceptance_rate(&self, _check_id: &dataqa_core::CheckId) -> Option<f64> {
                Some(self.0)
            }
        }

        let decisions = gate(&proposals, &results, &Fixed(1.0), &GateConfig::default());
        let decision = &decisions[&proposals[0].check_id];
        assert_eq!(decision.history, 1.0);
        assert!((decision.confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn insufficient_history_falls_back_to_the_neutral_prior() {
        let proposals = proposal("c", 0.5);
        let decisions = gate(
            &proposals,
            &[],
            &AcceptanceIndex::default(),
            &GateConfig::default(),
        );
        assert_eq!(decisions[&proposals[0].check_id].history, NEUTRAL_HISTORY);
    }

    #[test]
    fn gating_twice_is_byte_identical() {
        let proposals = parse_proposals(&json!([
            {"check_id": "b", "type": "unique", "column": "x", "likelihood": 0.7},
            {"check_id": "a", "type": "not_null", "column": "y", "likelihood": 0.2}
        ]))
        .unwrap();
        let results = result("a", json!({"unexpected_percent": 3.0}));

        let first = gate(&proposals, &results, &NeutralHistory, &GateConfig::default());
        let second = gate(&proposals, &results, &NeutralHistory, &GateConfig::default());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn promote_keeps_go_proposals() {
        let proposals = proposal("orders:unique:order_id", 0.9);
        let decisions = gate(&proposals, &[], &NeutralHistory, &GateConfig::default());

        match promote(&proposals, &decisions).unwrap() {
            GateOutcome::Promoted(kept) => assert_eq!(kept, proposals),
            GateOutcome::NoChanges => panic!("expected promotion"),
        }
    }

    #[test]
    fn empty_retained_set_signals_no_changes() {
        let proposals = proposal("c", 0.0);
        let results = result("c", json!({"unexpected_percent": 0}));
        let decisions = gate(&proposals, &results, &NeutralHistory, &GateConfig::default());

        assert_eq!(
            promote(&proposals, &decisions).unwrap(),
            GateOutcome::NoChanges
        );
    }

    #[test]
    fn foreign_decisions_are_rejected() {
        let proposals = proposal("c", 0.5);
        let err = promote(&proposals, &DecisionSet::new()).unwrap_err();
        assert!(matches!(err, GateError::MissingDecision { .. }));
    }

    proptest! {
        // Holding evidence and history fixed, more likelihood never means
        // less confidence.
        #[test]
        fn confidence_is_monotone_in_likelihood(
            lo in 0.0f64..=1.0,
            delta in 0.0f64..=1.0,
            percent in proptest::option::of(0.0f64..=100.0),
        ) {
            let hi = (lo + delta).min(1.0);
            let results = match percent {
                Some(p) => result("c", json!({"unexpected_percent": p})),
                None => Vec::new(),
            };
            let low = gate(&proposal("c", lo), &results, &NeutralHistory, &GateConfig::default());
            let high = gate(&proposal("c", hi), &results, &NeutralHistory, &GateConfig::default());
            let id = dataqa_core::CheckId::from("c");
            prop_assert!(high[&id].confidence >= low[&id].confidence);
        }
    }
}
