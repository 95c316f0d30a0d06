//! Proposal index: rule and id cross-references for one run's proposals.

use std::collections::BTreeMap;

use dataqa_core::{CheckId, Proposal};

/// Cross-reference of one run's proposals.
///
/// Maps each contract rule to the proposal ids referencing it (per-rule
/// insertion order preserved) and each proposal id back to its rule, when it
/// has one. Profile-derived proposals carry no rule.
#[derive(Debug, Clone, Default)]
pub struct ProposalIndex {
    rule_to_proposals: BTreeMap<String, Vec<CheckId>>,
    proposal_to_rule: BTreeMap<CheckId, Option<String>>,
}

impl ProposalIndex {
    /// Build the index from parsed proposals.
    pub fn from_proposals(proposals: &[Proposal]) -> Self {
        let mut index = Self::default();
        for proposal in proposals {
            let rule = proposal.rule().map(str::to_string);
            index
                .proposal_to_rule
                .insert(proposal.check_id.clone(), rule.clone());
            if let Some(rule) = rule {
                index
                    .rule_to_proposals
                    .entry(rule)
                    .or_default()
                    .push(proposal.check_id.clone());
            }
        }
        index
    }

    /// Proposal ids referencing `rule`, in proposal order.
    pub fn proposals_for_rule(&self, rule: &str) -> &[CheckId] {
        self.rule_to_proposals
            .get(rule)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rules referenced by at least one proposal.
    pub fn proposed_rules(&self) -> impl Iterator<Item = &str> {
        self.rule_to_proposals.keys().map(String::as_str)
    }

    /// The rule a check id traces back to.
    ///
    /// `None` means the id belongs to no known proposal; `Some(None)` means
    /// the proposal exists but is profile-derived.
    pub fn rule_for(&self, check_id: &CheckId) -> Option<Option<&str>> {
        self.proposal_to_rule
            .get(check_id)
            .map(|rule| rule.as_deref())
    }

    /// Whether `check_id` belongs to a known proposal.
    pub fn contains(&self, check_id: &CheckId) -> bool {
        self.proposal_to_rule.contains_key(check_id)
    }

    /// Number of distinct proposal ids.
    pub fn len(&self) -> usize {
        self.proposal_to_rule.len()
    }

    /// Whether the index holds no proposals.
    pub fn is_empty(&self) -> bool {
        self.proposal_to_rule.is_empty()
    }
}
