//! Rule-coverage reconciliation.
//!
//! Cross-references a dataset's contract rules against generated check
//! proposals and executed validation results, and renders the per-run
//! coverage report.

#![warn(missing_docs)]

pub mod index;
pub mod reconcile;
pub mod render;

pub use index::ProposalIndex;
pub use reconcile::reconcile;
pub use render::{render_table, to_csv};
