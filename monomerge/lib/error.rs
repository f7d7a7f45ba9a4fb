use std::path::PathBuf;

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a monomerge-related operation.
pub type MonomergeResult<T> = Result<T, MonomergeError>;

/// An error that occurred while preparing or running a merge.
///
/// Failures inside the merge walk itself are never reported through this type. They are
/// collected as [`MergeWarning`](crate::merge::MergeWarning)s instead.
#[derive(pretty_error_debug::Debug, Error)]
pub enum MonomergeError {
    /// An I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The overlay manifest could not be read.
    #[error("failed to read manifest {path}: {source}")]
    ManifestRead {
        /// The manifest path.
        path: PathBuf,

        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The overlay manifest is not valid TOML or does not match the expected shape.
    #[error("failed to parse manifest {path}: {source}")]
    ManifestParse {
        /// The manifest path.
        path: PathBuf,

        /// The underlying parse error.
        source: toml::de::Error,
    },

    /// Neither the command line nor a manifest supplied a required setting.
    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    /// No source directories were given.
    #[error("at least one source directory is required")]
    NoSources,

    /// A source directory does not exist.
    #[error("source does not exist: {0}")]
    SourceNotFound(PathBuf),

    /// A source path exists but is not a directory.
    #[error("source is not a directory: {0}")]
    SourceNotDirectory(PathBuf),

    /// Two sources live on different devices, so hard links between them are impossible.
    #[error("source {path} is on device {found}, expected device {expected} (same as {reference})")]
    SourceDeviceMismatch {
        /// The offending source.
        path: PathBuf,

        /// The device id of the offending source.
        found: u64,

        /// The first source, whose device every other source must share.
        reference: PathBuf,

        /// The device id of the first source.
        expected: u64,
    },

    /// The target path already exists.
    #[error("target already exists: {0}")]
    TargetExists(PathBuf),

    /// The directory that would contain the target does not exist.
    #[error("target parent directory does not exist: {0}")]
    TargetParentNotFound(PathBuf),

    /// The target would be created on a different device than the sources.
    #[error("target parent {path} is on device {found}, but sources are on device {expected}")]
    TargetDeviceMismatch {
        /// The target's parent directory.
        path: PathBuf,

        /// The device id of the target's parent directory.
        found: u64,

        /// The device id shared by all sources.
        expected: u64,
    },
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MonomergeError {
    /// Returns `true` if the error is a violated merge precondition rather than an I/O or
    /// configuration problem.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            MonomergeError::NoSources
                | MonomergeError::SourceNotFound(_)
                | MonomergeError::SourceNotDirectory(_)
                | MonomergeError::SourceDeviceMismatch { .. }
                | MonomergeError::TargetExists(_)
                | MonomergeError::TargetParentNotFound(_)
                | MonomergeError::TargetDeviceMismatch { .. }
        )
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
