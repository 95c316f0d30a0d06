//! Coverage reconciliation across rules, proposals, and execution results.

use std::collections::{BTreeMap, BTreeSet};

use dataqa_core::{CheckId, CheckResult, CoverageRow, CoverageStat, CoverageSummary, RunRef};

use crate::ProposalIndex;

/// Cross-reference contract rules, proposals, and executed results into the
/// per-run coverage report.
///
/// Reconciliation never fails: any of the three inputs may be empty, which
/// simply shows up as uncovered rules or an empty table. Executed checks that
/// match no known proposal are surfaced in `unmapped_existing`; checks that
/// match a profile-derived proposal land in `proposal_only_existing`. Neither
/// set affects the coverage percentages.
pub fn reconcile(
    run: &RunRef,
    rules: &[String],
    index: &ProposalIndex,
    results: &[CheckResult],
) -> CoverageSummary {
    let mut rule_to_existing: BTreeMap<&str, Vec<CheckId>> = BTreeMap::new();
    let mut unmapped: BTreeSet<CheckId> = BTreeSet::new();
    let mut proposal_only: BTreeSet<CheckId> = BTreeSet::new();

    for result in results {
        match index.rule_for(&result.check_id) {
            Some(Some(rule)) => rule_to_existing
                .entry(rule)
                .or_default()
                .push(result.check_id.clone()),
            Some(None) => {
                proposal_only.insert(result.check_id.clone());
            }
            None => {
                tracing::warn!(
                    check_id = %result.check_id,
                    "executed check matches no known proposal"
                );
                unmapped.insert(result.check_id.clone());
            }
        }
    }

    let rule_set: BTreeSet<&str> = rules.iter().map(String::as_str).collect();
    let covered_by_proposals = index
        .proposed_rules()
        .filter(|rule| rule_set.contains(rule))
        .count();
    let covered_by_expectations = rule_to_existing
        .keys()
        .filter(|rule| rule_set.contains(*rule))
        .count();

    let mut sorted_rules: Vec<&String> = rules.iter().collect();
    sorted_rules.sort();
    let table = sorted_rules
        .into_iter()
        .map(|rule| CoverageRow {
            rule: rule.clone(),
            proposals: index.proposals_for_rule(rule).to_vec(),
            expectations: rule_to_existing
                .get(rule.as_str())
                .cloned()
                .unwrap_or_default(),
        })
        .collect();

    CoverageSummary {
        dataset: run.dataset.clone(),
        run_id: run.run_id.clone(),
        proposal_coverage: stat(covered_by_proposals, rules.len()),
        expectation_coverage: stat(covered_by_expectations, rules.len()),
        table,
        unmapped_existing: unmapped.into_iter().collect(),
        proposal_only_existing: proposal_only.into_iter().collect(),
    }
}

fn stat(covered: usize, total: usize) -> CoverageStat {
    // An empty catalog is vacuously covered.
    let pct = if total == 0 {
        1.0
    } else {
        covered as f64 / total as f64
    };
    CoverageStat {
        covered,
        total,
        pct,
    }
}
