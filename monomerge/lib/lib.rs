//! `monomerge` materializes a read-only union view of several directory trees.
//!
//! # Overview
//!
//! Given source directories in priority order and a target path that does not exist yet,
//! monomerge builds the target as the union of all sources:
//!
//! - Regular files are hard-linked, so no file content is ever copied
//! - Symlinks are recreated pointing at the fully resolved absolute path of their destination
//! - Directories are created fresh with the mode and ownership of the highest-priority source
//!   that has them, and their contents are merged recursively
//!
//! When several sources provide the same name, the first (highest-priority) one wins. A name
//! that is a directory in one source and something else in another keeps whichever type was
//! seen first; the other is dropped with a warning. Dot-prefixed names are never merged.
//!
//! This assembles composite layouts, like package or configuration overlays, without kernel
//! union-mount support. The result is a snapshot: later changes to the sources are not reflected
//! in the tree structure.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use monomerge::config::MergeConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = MergeConfig::builder()
//!         .sources(vec!["overlay/site".into(), "overlay/base".into()])
//!         .target("composite")
//!         .build();
//!
//!     let report = monomerge::merge(&config)?;
//!     println!("linked {} files", report.get_files_linked());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`merge`] - The overlay merge itself
//! - [`preflight`] - Precondition checks run before merging
//! - [`config`] - Merge configuration and overlay manifests
//! - [`cli`] - Command-line argument types
//! - [`utils`] - Common utilities and helpers
//!
//! # Platform Support
//!
//! Unix only. Hard links, symlinks and numeric ownership are required.

#![warn(missing_docs)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod cli;
pub mod config;
pub mod merge;
pub mod preflight;
pub mod utils;

pub use error::*;

use config::MergeConfig;
use merge::{MergeReport, Merger};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Validates the preconditions of `config` and then runs the merge.
///
/// Only a failed precondition is an error. Problems during the merge are reported as warnings in
/// the returned [`MergeReport`].
pub fn merge(config: &MergeConfig) -> MonomergeResult<MergeReport> {
    preflight::validate(config)?;
    Ok(Merger::from_config(config).merge())
}
