use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use getset::Getters;

use crate::{config::MergeConfig, utils};

use super::{
    materialize, AggregationMap, CreatedDir, EntryKind, EntryMetadata, MergeReport, MergeWarning,
    ResolutionTable, ResolvedEntry, Slot, SourceId,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Materializes the union of several source trees into a new target directory.
///
/// Sources are in priority order: for any name provided by several sources, the first source's
/// entry wins. Directories present in several sources are merged recursively. Regular files are
/// hard-linked, symlinks are recreated pointing at their fully resolved destination and
/// directories are created fresh with the ownership and mode of their highest-priority source.
///
/// The merger never fails as a whole. Problems are confined to the smallest scope possible (an
/// entry, a source for one directory, or one subtree) and reported in the returned
/// [`MergeReport`].
///
/// The caller must ensure the target does not exist yet and that every source is a directory on
/// the same device; see [`preflight::validate`](crate::preflight::validate).
///
/// # Example
///
/// ```no_run
/// use monomerge::merge::Merger;
///
/// let merger = Merger::new(vec!["overlay/site".into(), "overlay/base".into()], "composite");
/// let report = merger.merge();
///
/// for warning in report.get_warnings() {
///     eprintln!("{}", warning);
/// }
/// ```
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub with_prefix")]
pub struct Merger {
    /// Source roots, highest priority first.
    sources: Vec<PathBuf>,

    /// The directory to create the composite tree in.
    target: PathBuf,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Merger {
    /// Creates a merger for `sources` (highest priority first) into `target`.
    pub fn new(sources: Vec<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            sources,
            target: target.into(),
        }
    }

    /// Creates a merger from a resolved configuration.
    pub fn from_config(config: &MergeConfig) -> Self {
        Self::new(config.get_sources().clone(), config.get_target().clone())
    }

    /// Runs the merge, creating the target root and everything beneath it.
    pub fn merge(&self) -> MergeReport {
        let mut report = MergeReport::default();
        let all: Vec<SourceId> = (0..self.sources.len()).map(SourceId::new).collect();

        tracing::info!(
            "Merging {} source(s) into {}",
            self.sources.len(),
            self.target.display()
        );

        self.merge_dir(Path::new(""), &all, &mut report);

        tracing::info!(
            "Merge complete: {} directories, {} files, {} symlinks, {} warnings",
            report.get_dirs_created(),
            report.get_files_linked(),
            report.get_symlinks_created(),
            report.get_warnings().len()
        );

        report
    }

    /// Merges the directory at `composite` from `sources`, every one of which has a directory
    /// there, then recurses into the subdirectories discovered.
    fn merge_dir(&self, composite: &Path, sources: &[SourceId], report: &mut MergeReport) {
        let Some(&reference) = sources.first() else {
            return;
        };

        let Some(created) = self.materialize_dir(composite, reference, report) else {
            return;
        };

        let mut table = ResolutionTable::default();
        let mut subdirs = AggregationMap::default();
        for &source in sources {
            self.scan_source(composite, source, &mut table, &mut subdirs, report);
        }
        drop(table);

        for (name, contributors) in subdirs {
            self.merge_dir(&composite.join(name), &contributors, report);
        }

        // Mode last: the reference directory may be read-only.
        created.finish();
    }

    /// Creates the target directory for `composite`, cloning ownership from `reference`.
    ///
    /// Returns `None` if the directory could not be created, in which case the subtree must not
    /// be visited.
    fn materialize_dir(
        &self,
        composite: &Path,
        reference: SourceId,
        report: &mut MergeReport,
    ) -> Option<CreatedDir> {
        let target = self.target_path(composite);
        let reference = self.source_path(reference, composite);

        match materialize::create_dir(&target, &reference) {
            Ok(created) => {
                report.record_dir();
                Some(created)
            }
            Err(e) => {
                report.warn(MergeWarning::CreateDir {
                    path: composite.to_path_buf(),
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    /// Scans one source's listing of `composite` and resolves each visible entry in it.
    ///
    /// The directory handle is closed when this returns, whichever path it takes.
    fn scan_source(
        &self,
        composite: &Path,
        source: SourceId,
        table: &mut ResolutionTable,
        subdirs: &mut AggregationMap,
        report: &mut MergeReport,
    ) {
        let dir = self.source_path(source, composite);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                report.warn(self.open_dir_warning(source, composite, e));
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    report.warn(self.open_dir_warning(source, composite, e));
                    break;
                }
            };

            let name = entry.file_name();
            if utils::is_hidden_name(&name) {
                tracing::trace!("Skipping hidden entry: {}", entry.path().display());
                continue;
            }

            // `DirEntry::metadata` does not traverse symlinks.
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    report.warn(MergeWarning::Stat {
                        root: self.root(source).to_path_buf(),
                        path: composite.join(&name),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let kind = EntryKind::from(metadata.file_type());
            let metadata = EntryMetadata::from(&metadata);
            self.resolve_entry(composite, name, source, kind, metadata, table, subdirs, report);
        }
    }

    /// Decides what a single entry contributes to the composite tree.
    #[allow(clippy::too_many_arguments)]
    fn resolve_entry(
        &self,
        composite: &Path,
        name: OsString,
        source: SourceId,
        kind: EntryKind,
        metadata: EntryMetadata,
        table: &mut ResolutionTable,
        subdirs: &mut AggregationMap,
        report: &mut MergeReport,
    ) {
        let path = composite.join(&name);

        match table.slot(name.clone()) {
            Slot::Taken(winner) if winner.get_kind() != kind => {
                report.warn(MergeWarning::TypeConflict {
                    path,
                    winner_root: self.root(winner.get_source()).to_path_buf(),
                    winner_kind: winner.get_kind(),
                    root: self.root(source).to_path_buf(),
                    kind,
                });
            }
            Slot::Taken(_) if kind.is_dir() => {
                subdirs.extend(name, source);
            }
            Slot::Taken(winner) => {
                tracing::trace!(
                    "{} from {} superseded by {} ({}) from {}",
                    path.display(),
                    self.root(source).display(),
                    winner.get_kind(),
                    utils::format_mode(winner.get_metadata().permissions()),
                    self.root(winner.get_source()).display()
                );
            }
            Slot::Open(slot) => {
                if self.materialize_entry(&path, &name, source, kind, subdirs, report) {
                    slot.claim(ResolvedEntry::new(source, kind, metadata));
                }
            }
        }
    }

    /// Materializes the first entry seen for a name.
    ///
    /// Returns `true` if the entry now owns the name. Files and symlinks own it only once their
    /// link exists, so a failed link leaves the name open for a lower-priority source.
    /// Directories own it immediately; they are created later by the recursion.
    fn materialize_entry(
        &self,
        path: &Path,
        name: &OsString,
        source: SourceId,
        kind: EntryKind,
        subdirs: &mut AggregationMap,
        report: &mut MergeReport,
    ) -> bool {
        let source_path = self.source_path(source, path);
        let target_path = self.target_path(path);

        match kind {
            EntryKind::File => match materialize::link_file(&source_path, &target_path) {
                Ok(()) => {
                    report.record_file();
                    true
                }
                Err(e) => {
                    report.warn(MergeWarning::HardLink {
                        root: self.root(source).to_path_buf(),
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    });
                    false
                }
            },
            EntryKind::Directory => {
                subdirs.start(name.clone(), source);
                true
            }
            EntryKind::Symlink => match materialize::link_symlink(&source_path, &target_path) {
                Ok(_) => {
                    report.record_symlink();
                    true
                }
                Err(e) => {
                    report.warn(MergeWarning::Symlink {
                        root: self.root(source).to_path_buf(),
                        path: path.to_path_buf(),
                        reason: e.to_string(),
                    });
                    false
                }
            },
            EntryKind::Special => {
                report.warn(MergeWarning::Special {
                    root: self.root(source).to_path_buf(),
                    path: path.to_path_buf(),
                    kind,
                });
                false
            }
        }
    }

    fn open_dir_warning(
        &self,
        source: SourceId,
        composite: &Path,
        error: std::io::Error,
    ) -> MergeWarning {
        MergeWarning::OpenDir {
            root: self.root(source).to_path_buf(),
            path: composite.to_path_buf(),
            reason: error.to_string(),
        }
    }

    fn root(&self, source: SourceId) -> &Path {
        &self.sources[source.index()]
    }

    fn source_path(&self, source: SourceId, composite: &Path) -> PathBuf {
        self.root(source).join(composite)
    }

    fn target_path(&self, composite: &Path) -> PathBuf {
        self.target.join(composite)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
