use std::{
    fmt::{self, Display},
    fs::{FileType, Metadata},
    os::unix::fs::{FileTypeExt, MetadataExt},
};

use getset::CopyGetters;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The type of a directory entry as seen by a non-dereferencing stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A regular file. Materialized as a hard link.
    File,

    /// A directory. Materialized as a fresh directory whose contents are merged recursively.
    Directory,

    /// A symbolic link. Materialized as a new symlink to the fully resolved target.
    Symlink,

    /// Anything else: block and character devices, sockets, FIFOs. Never materialized.
    Special,
}

/// The raw metadata captured for a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub with_prefix")]
pub struct EntryMetadata {
    /// Full `st_mode`, file type bits included.
    mode: u32,

    /// Numeric owner.
    uid: u32,

    /// Numeric group.
    gid: u32,

    /// Device id of the filesystem holding the entry. Recorded for diagnostics; the merge
    /// itself relies on preflight for the same-device guarantee.
    dev: u64,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl EntryKind {
    /// Classifies a file type into one of the four kinds the merge distinguishes.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            debug_assert!(
                file_type.is_block_device()
                    || file_type.is_char_device()
                    || file_type.is_fifo()
                    || file_type.is_socket()
            );
            EntryKind::Special
        }
    }

    /// Returns `true` for directories.
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

impl EntryMetadata {
    /// Creates entry metadata from raw fields.
    pub fn new(mode: u32, uid: u32, gid: u32, dev: u64) -> Self {
        Self {
            mode,
            uid,
            gid,
            dev,
        }
    }

    /// Returns the permission bits of the mode, without the file type.
    pub fn permissions(&self) -> u32 {
        self.mode & crate::utils::PERMISSION_BITS_MASK
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<&Metadata> for EntryMetadata {
    fn from(metadata: &Metadata) -> Self {
        Self::new(
            metadata.mode(),
            metadata.uid(),
            metadata.gid(),
            metadata.dev(),
        )
    }
}

impl From<FileType> for EntryKind {
    fn from(file_type: FileType) -> Self {
        Self::from_file_type(file_type)
    }
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryKind::File => "regular file",
            EntryKind::Directory => "directory",
            EntryKind::Symlink => "symbolic link",
            EntryKind::Special => "special file",
        };

        write!(f, "{}", name)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
