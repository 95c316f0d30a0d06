//! Artifact I/O for pipeline runs.
//!
//! Loads contracts, proposals, validation reports, and review history, and
//! persists decisions and coverage reports. Everything above this crate is
//! pure; everything below it is the filesystem.

#![warn(missing_docs)]

mod fs;
mod store;

pub use fs::FsArtifactStore;
pub use store::{ArtifactError, ArtifactStore, Result};
