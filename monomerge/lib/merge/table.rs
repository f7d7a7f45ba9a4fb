//! Per-directory bookkeeping for a single merge call.
//!
//! Both structures live only as long as one directory's scan. They are never shared between
//! sibling calls.

use std::{
    collections::{
        btree_map,
        hash_map::{Entry, VacantEntry},
        BTreeMap, HashMap,
    },
    ffi::OsString,
};

use getset::CopyGetters;

use super::{EntryKind, EntryMetadata, SourceId};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The entry that won a name within one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub with_prefix")]
pub struct ResolvedEntry {
    /// The source the winning entry was read from.
    source: SourceId,

    /// The type of the winning entry.
    kind: EntryKind,

    /// The metadata of the winning entry.
    metadata: EntryMetadata,
}

/// Maps child names to the entry that won them.
///
/// Once a name is present its winner never changes.
#[derive(Debug, Default)]
pub struct ResolutionTable {
    entries: HashMap<OsString, ResolvedEntry>,
}

/// The outcome of looking a name up in a [`ResolutionTable`].
pub enum Slot<'a> {
    /// A higher-priority source already won the name.
    Taken(&'a ResolvedEntry),

    /// Nobody has won the name yet. Filling the slot makes the caller the winner.
    Open(OpenSlot<'a>),
}

/// A name that has not been resolved yet.
pub struct OpenSlot<'a> {
    inner: VacantEntry<'a, OsString, ResolvedEntry>,
}

/// Maps directory-typed child names to the sources contributing a directory of that name.
///
/// Contributors are kept in the order they were scanned, which is priority order. Names iterate
/// in byte order so recursion is deterministic.
#[derive(Debug, Default)]
pub struct AggregationMap {
    dirs: BTreeMap<OsString, Vec<SourceId>>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ResolvedEntry {
    /// Creates a resolved entry.
    pub fn new(source: SourceId, kind: EntryKind, metadata: EntryMetadata) -> Self {
        Self {
            source,
            kind,
            metadata,
        }
    }
}

impl ResolutionTable {
    /// Looks up `name` in one step, returning either its winner or a slot to claim it with.
    pub fn slot(&mut self, name: OsString) -> Slot<'_> {
        match self.entries.entry(name) {
            Entry::Occupied(occupied) => Slot::Taken(occupied.into_mut()),
            Entry::Vacant(inner) => Slot::Open(OpenSlot { inner }),
        }
    }
}

impl<'a> OpenSlot<'a> {
    /// Records `entry` as the winner for this name.
    pub fn claim(self, entry: ResolvedEntry) -> &'a ResolvedEntry {
        self.inner.insert(entry)
    }
}

impl AggregationMap {
    /// Starts tracking a new subdirectory contributed first by `source`.
    pub fn start(&mut self, name: OsString, source: SourceId) {
        self.dirs.insert(name, vec![source]);
    }

    /// Adds a lower-priority `source` that also has a directory named `name`.
    pub fn extend(&mut self, name: OsString, source: SourceId) {
        self.dirs.entry(name).or_default().push(source);
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl IntoIterator for AggregationMap {
    type Item = (OsString, Vec<SourceId>);
    type IntoIter = btree_map::IntoIter<OsString, Vec<SourceId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.dirs.into_iter()
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
