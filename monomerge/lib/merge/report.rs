use std::path::PathBuf;

use getset::{CopyGetters, Getters};
use thiserror::Error;

use super::EntryKind;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A recoverable problem encountered while merging.
///
/// Every `path` is relative to the composite root (and therefore to every source root). Every
/// `root` is the source root involved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeWarning {
    /// The target directory could not be created. Nothing beneath it was merged.
    #[error("failed to create directory '{}': {reason}", crate::utils::display_composite(path))]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,

        /// Why creation failed.
        reason: String,
    },

    /// A source directory could not be read. That source was skipped for this directory.
    #[error("failed to read directory '{}' in source {}: {reason}", crate::utils::display_composite(path), root.display())]
    OpenDir {
        /// The source root.
        root: PathBuf,

        /// The directory that could not be read.
        path: PathBuf,

        /// Why reading failed.
        reason: String,
    },

    /// An entry could not be stat'ed. The entry was skipped.
    #[error("failed to stat '{}' in source {}: {reason}", path.display(), root.display())]
    Stat {
        /// The source root.
        root: PathBuf,

        /// The entry that could not be stat'ed.
        path: PathBuf,

        /// Why stat failed.
        reason: String,
    },

    /// Two sources provide the same name with different types. The later one was discarded.
    #[error(
        "type conflict at '{}': {winner_kind} from {} wins over {kind} from {}",
        path.display(),
        winner_root.display(),
        root.display()
    )]
    TypeConflict {
        /// The conflicting name.
        path: PathBuf,

        /// The source whose entry won.
        winner_root: PathBuf,

        /// The type of the winning entry.
        winner_kind: EntryKind,

        /// The source whose entry was discarded.
        root: PathBuf,

        /// The type of the discarded entry.
        kind: EntryKind,
    },

    /// A regular file could not be hard-linked.
    #[error("failed to link '{}' from source {}: {reason}", path.display(), root.display())]
    HardLink {
        /// The source root.
        root: PathBuf,

        /// The file that could not be linked.
        path: PathBuf,

        /// Why linking failed.
        reason: String,
    },

    /// A symlink could not be resolved or recreated.
    #[error("failed to symlink '{}' from source {}: {reason}", path.display(), root.display())]
    Symlink {
        /// The source root.
        root: PathBuf,

        /// The symlink that could not be recreated.
        path: PathBuf,

        /// Why resolving or creating the link failed.
        reason: String,
    },

    /// A device node, socket or FIFO was found. These are never merged.
    #[error("skipping {kind} '{}' in source {}", path.display(), root.display())]
    Special {
        /// The source root.
        root: PathBuf,

        /// The special entry.
        path: PathBuf,

        /// Always [`EntryKind::Special`].
        kind: EntryKind,
    },
}

/// The outcome of a merge run: what was materialized and what went wrong.
#[derive(Debug, Default, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct MergeReport {
    /// Number of directories created, the target root included.
    #[getset(get_copy = "pub with_prefix")]
    dirs_created: usize,

    /// Number of regular files hard-linked.
    #[getset(get_copy = "pub with_prefix")]
    files_linked: usize,

    /// Number of symlinks created.
    #[getset(get_copy = "pub with_prefix")]
    symlinks_created: usize,

    /// Every warning, in the order it was emitted.
    #[getset(get = "pub with_prefix")]
    warnings: Vec<MergeWarning>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MergeWarning {
    /// Returns the composite-relative path the warning is about.
    pub fn path(&self) -> &PathBuf {
        match self {
            MergeWarning::CreateDir { path, .. }
            | MergeWarning::OpenDir { path, .. }
            | MergeWarning::Stat { path, .. }
            | MergeWarning::TypeConflict { path, .. }
            | MergeWarning::HardLink { path, .. }
            | MergeWarning::Symlink { path, .. }
            | MergeWarning::Special { path, .. } => path,
        }
    }
}

impl MergeReport {
    /// Returns `true` if the merge produced no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Logs `warning` and keeps it.
    pub(crate) fn warn(&mut self, warning: MergeWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub(crate) fn record_dir(&mut self) {
        self.dirs_created += 1;
    }

    pub(crate) fn record_file(&mut self) {
        self.files_linked += 1;
    }

    pub(crate) fn record_symlink(&mut self) {
        self.symlinks_created += 1;
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
