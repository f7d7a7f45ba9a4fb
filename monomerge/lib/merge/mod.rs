//! The overlay merge: materializing a union view of several directory trees.
//!
//! The merge walks the composite tree depth first. For each directory it:
//!
//! 1. Creates the target directory and gives it the ownership of the first (highest-priority)
//!    source that has it. If creation fails, the whole subtree is skipped.
//! 2. Scans every contributing source's listing in priority order. The first source to provide a
//!    name wins it. Files are hard-linked and symlinks recreated right away, while directories are
//!    collected together with every source that also has a directory of that name.
//! 3. Recurses once per collected subdirectory with just the sources that contribute to it.
//! 4. Applies the first source's permission bits, now that nothing more is written below it.
//!
//! Entries of the same name but different type in a later source are reported as type conflicts
//! and dropped. Dot-prefixed names are never merged.

mod entry;
mod materialize;
mod merger;
mod report;
mod source;
mod table;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use entry::*;
pub use materialize::*;
pub use merger::*;
pub use report::*;
pub use source::*;
pub use table::*;
