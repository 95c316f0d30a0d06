//! Check proposals and proposal-record parsing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::CheckId;

/// Field names accepted as an explicit proposal id, in preference order.
const ID_FIELDS: [&str; 4] = ["check_id", "id", "proposal_id", "proposalId"];

/// A proposal record that cannot participate in the run.
///
/// Fatal for that proposal only; callers decide whether to skip the record or
/// abort the run.
#[derive(Debug, thiserror::Error)]
pub enum MalformedProposalError {
    /// The proposals artifact is neither an array nor `{"proposals": [...]}`.
    #[error("proposals artifact is not an array of records")]
    NotAnArray,

    /// A record is not a JSON object.
    #[error("proposal {index} is not an object")]
    NotAnObject {
        /// Position of the record in the input.
        index: usize,
    },

    /// A record lacks a required field.
    #[error("proposal {index} is missing required field `{field}`")]
    MissingField {
        /// Position of the record in the input.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A record declares a check type the engine does not know.
    #[error("proposal {index} has unknown check type `{value}`")]
    UnknownType {
        /// Position of the record in the input.
        index: usize,
        /// The offending type string.
        value: String,
    },

    /// A record failed to deserialize.
    #[error("proposal {index} is invalid: {source}")]
    Invalid {
        /// Position of the record in the input.
        index: usize,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },
}

/// Kinds of checks the proposer can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    /// Column must not contain NULLs.
    NotNull,
    /// Column values must be unique.
    Unique,
    /// Values must fall inside a numeric range.
    Range,
    /// Values must come from a fixed value set.
    Domain,
    /// Data must be recent enough.
    Freshness,
    /// Values must exist in a referenced table.
    ForeignKey,
}

/// Where a proposal came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    /// Contract rule the proposal traces back to, if any.
    #[serde(default)]
    pub rule: Option<String>,

    /// Whether the proposal was derived from the contract rather than from
    /// the observed data profile.
    #[serde(default)]
    pub from_contract: bool,
}

/// A candidate quality check.
///
/// Proposals are produced once per run and are immutable inputs to coverage
/// and gating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Stable id of the check within the run.
    pub check_id: CheckId,

    /// Check kind.
    #[serde(rename = "type")]
    pub check_type: CheckType,

    /// Target column.
    pub column: String,

    /// Check-specific configuration.
    #[serde(default)]
    pub params: Map<String, Value>,

    /// Free-text justification from the proposer.
    #[serde(default)]
    pub rationale: String,

    /// Profiling statistics backing the likelihood estimate.
    #[serde(default)]
    pub signals: Map<String, Value>,

    /// Predicted probability that the check holds on real data.
    #[serde(default)]
    pub likelihood: f64,

    /// Back-reference to the contract; absent for profile-derived checks.
    #[serde(default)]
    pub origin: Option<Origin>,
}

impl Proposal {
    /// The contract rule this proposal enforces, if it traces back to one.
    pub fn rule(&self) -> Option<&str> {
        self.origin.as_ref().and_then(|o| o.rule.as_deref())
    }
}

/// Parse a proposals artifact into proposals.
///
/// Accepts either a bare array of records or an object wrapping the array
/// under a `proposals` key. Fails on the first malformed record; use
/// [`parse_proposal`] directly to apply a skip-and-log policy instead.
pub fn parse_proposals(value: &Value) -> Result<Vec<Proposal>, MalformedProposalError> {
    proposal_records(value)?
        .iter()
        .enumerate()
        .map(|(index, record)| parse_proposal(index, record))
        .collect()
}

/// The record array inside a proposals artifact.
pub fn proposal_records(value: &Value) -> Result<&Vec<Value>, MalformedProposalError> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(map) => match map.get("proposals") {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(MalformedProposalError::NotAnArray),
        },
        _ => Err(MalformedProposalError::NotAnArray),
    }
}

/// Parse a single proposal record.
///
/// The id is taken from the first of `check_id`, `id`, `proposal_id`,
/// `proposalId`; records without any of them get a deterministic id derived
/// from their content.
pub fn parse_proposal(index: usize, record: &Value) -> Result<Proposal, MalformedProposalError> {
    let obj = record
        .as_object()
        .ok_or(MalformedProposalError::NotAnObject { index })?;

    let type_value = obj
        .get("type")
        .and_then(Value::as_str)
        .ok_or(MalformedProposalError::MissingField {
            index,
            field: "type",
        })?;
    serde_json::from_value::<CheckType>(Value::String(type_value.to_string())).map_err(|_| {
        MalformedProposalError::UnknownType {
            index,
            value: type_value.to_string(),
        }
    })?;

    if obj.get("column").and_then(Value::as_str).is_none() {
        return Err(MalformedProposalError::MissingField {
            index,
            field: "column",
        });
    }

    let check_id = explicit_id(obj).unwrap_or_else(|| content_id(record));

    let mut patched = obj.clone();
    patched.insert("check_id".to_string(), Value::String(check_id));
    serde_json::from_value(Value::Object(patched))
        .map_err(|source| MalformedProposalError::Invalid { index, source })
}

fn explicit_id(record: &Map<String, Value>) -> Option<String> {
    ID_FIELDS
        .iter()
        .find_map(|field| record.get(*field).and_then(Value::as_str))
        .map(str::to_string)
}

/// Deterministic id for a proposal record without an explicit one.
///
/// serde_json object keys serialize in sorted order, so equal content always
/// produces the same digest. Two genuinely different records hashing to the
/// same id is an accepted collision risk.
fn content_id(record: &Value) -> String {
    let digest = blake3::hash(record.to_string().as_bytes());
    format!("content:{}", &digest.to_hex().as_str()[..16])
}
