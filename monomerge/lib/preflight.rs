//! Checks that must hold before a merge may start.
//!
//! The merge itself assumes every source is a directory, that hard links between the sources and
//! the target are possible, and that it is free to create the target from scratch. This module
//! verifies those assumptions up front.

use std::{
    fs, io,
    os::unix::fs::MetadataExt,
    path::{Path, PathBuf},
};

use crate::{config::MergeConfig, MonomergeError, MonomergeResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Validates the preconditions of a merge.
///
/// Checks that:
/// - at least one source is given
/// - every source exists and is a directory
/// - all sources are on the same device
/// - the target does not exist (a dangling symlink counts as existing)
/// - the target's parent directory exists and is on the same device as the sources
///
/// The first violation is returned. Any further violations are logged.
pub fn validate(config: &MergeConfig) -> MonomergeResult<()> {
    let mut errors = Vec::new();

    let sources = config.get_sources();
    if sources.is_empty() {
        return Err(MonomergeError::NoSources);
    }

    let device = validate_sources(sources, &mut errors);
    validate_target(config.get_target(), device, &mut errors);

    let mut errors = errors.into_iter();
    match errors.next() {
        None => Ok(()),
        Some(first) => {
            for error in errors {
                tracing::error!("{}", error);
            }
            Err(first)
        }
    }
}

/// Checks each source and returns the device id of the first valid one.
fn validate_sources(sources: &[PathBuf], errors: &mut Vec<MonomergeError>) -> Option<u64> {
    let mut reference: Option<(&Path, u64)> = None;

    for source in sources {
        // The root itself may be a symlink to a directory.
        let metadata = match fs::metadata(source) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                errors.push(MonomergeError::SourceNotFound(source.clone()));
                continue;
            }
            Err(e) => {
                errors.push(e.into());
                continue;
            }
        };

        if !metadata.is_dir() {
            errors.push(MonomergeError::SourceNotDirectory(source.clone()));
            continue;
        }

        match reference {
            None => reference = Some((source.as_path(), metadata.dev())),
            Some((reference_path, expected)) if metadata.dev() != expected => {
                errors.push(MonomergeError::SourceDeviceMismatch {
                    path: source.clone(),
                    found: metadata.dev(),
                    reference: reference_path.to_path_buf(),
                    expected,
                });
            }
            Some(_) => {}
        }
    }

    reference.map(|(_, device)| device)
}

/// Checks that the target is free and can hold hard links to the sources.
fn validate_target(target: &Path, device: Option<u64>, errors: &mut Vec<MonomergeError>) {
    match fs::symlink_metadata(target) {
        Ok(_) => errors.push(MonomergeError::TargetExists(target.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => errors.push(e.into()),
    }

    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    match fs::metadata(parent) {
        Ok(metadata) => {
            if let Some(expected) = device {
                if metadata.dev() != expected {
                    errors.push(MonomergeError::TargetDeviceMismatch {
                        path: parent.to_path_buf(),
                        found: metadata.dev(),
                        expected,
                    });
                }
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            errors.push(MonomergeError::TargetParentNotFound(parent.to_path_buf()));
        }
        Err(e) => errors.push(e.into()),
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::os::unix::fs::symlink;

    use tempfile::tempdir;

    use super::*;

    fn config(sources: Vec<PathBuf>, target: PathBuf) -> MergeConfig {
        MergeConfig::builder().sources(sources).target(target).build()
    }

    #[test_log::test]
    fn test_preflight_accepts_valid_layout() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::create_dir(&a)?;
        fs::create_dir(&b)?;

        validate(&config(vec![a, b], temp.path().join("out")))?;
        Ok(())
    }

    #[test_log::test]
    fn test_preflight_accepts_symlinked_source_root() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let real = temp.path().join("real");
        let link = temp.path().join("link");
        fs::create_dir(&real)?;
        symlink(&real, &link)?;

        validate(&config(vec![link], temp.path().join("out")))?;
        Ok(())
    }

    #[test_log::test]
    fn test_preflight_rejects_empty_sources() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let err = validate(&config(vec![], temp.path().join("out"))).unwrap_err();
        assert!(matches!(err, MonomergeError::NoSources));
        Ok(())
    }

    #[test_log::test]
    fn test_preflight_rejects_missing_source() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let missing = temp.path().join("missing");

        let err = validate(&config(vec![missing.clone()], temp.path().join("out"))).unwrap_err();
        assert!(matches!(err, MonomergeError::SourceNotFound(path) if path == missing));
        Ok(())
    }

    #[test_log::test]
    fn test_preflight_rejects_file_source() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let file = temp.path().join("file");
        fs::write(&file, "not a dir")?;

        let err = validate(&config(vec![file.clone()], temp.path().join("out"))).unwrap_err();
        assert!(matches!(err, MonomergeError::SourceNotDirectory(path) if path == file));
        Ok(())
    }

    #[test_log::test]
    fn test_preflight_rejects_existing_target() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let source = temp.path().join("source");
        let target = temp.path().join("out");
        fs::create_dir(&source)?;
        fs::create_dir(&target)?;

        let err = validate(&config(vec![source], target.clone())).unwrap_err();
        assert!(matches!(err, MonomergeError::TargetExists(path) if path == target));
        Ok(())
    }

    #[test_log::test]
    fn test_preflight_rejects_dangling_symlink_target() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let source = temp.path().join("source");
        let target = temp.path().join("out");
        fs::create_dir(&source)?;
        symlink(temp.path().join("nowhere"), &target)?;

        let err = validate(&config(vec![source], target)).unwrap_err();
        assert!(matches!(err, MonomergeError::TargetExists(_)));
        Ok(())
    }

    #[test_log::test]
    fn test_preflight_rejects_missing_target_parent() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let source = temp.path().join("source");
        fs::create_dir(&source)?;
        let parent = temp.path().join("no/such");

        let err = validate(&config(vec![source], parent.join("out"))).unwrap_err();
        assert!(matches!(err, MonomergeError::TargetParentNotFound(path) if path == parent));
        Ok(())
    }

    #[test_log::test]
    fn test_preflight_reports_first_of_several_errors() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let missing = temp.path().join("missing");
        let target = temp.path().join("out");
        fs::create_dir(&target)?;

        let err = validate(&config(vec![missing], target)).unwrap_err();
        assert!(matches!(err, MonomergeError::SourceNotFound(_)));
        Ok(())
    }
}
