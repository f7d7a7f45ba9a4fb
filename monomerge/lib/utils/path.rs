use std::{
    ffi::OsStr,
    os::unix::ffi::OsStrExt,
    path::{Path, PathBuf},
};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The default file name of an overlay manifest.
pub const MANIFEST_FILENAME: &str = "monomerge.toml";

/// Directory entries whose name starts with this byte are never merged.
pub const HIDDEN_NAME_PREFIX: u8 = b'.';

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns `true` if a directory entry name is hidden by the dot convention.
///
/// This covers `.` and `..` as well as any other dot-prefixed name.
pub fn is_hidden_name(name: &OsStr) -> bool {
    name.as_bytes().first() == Some(&HIDDEN_NAME_PREFIX)
}

/// Renders a composite-relative path for diagnostics, using `.` for the composite root.
pub fn display_composite(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        ".".to_string()
    } else {
        path.display().to_string()
    }
}

/// Resolves `path` against `base` unless it is already absolute.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
