//! Creation of target entries: directories, hard links and symlinks.
//!
//! Every function here works on absolute (or caller-relative) filesystem paths. Deciding
//! *whether* to create something is the merger's job.

use std::{
    fs,
    io,
    os::unix::fs::{symlink, PermissionsExt},
    path::{Path, PathBuf},
};

use nix::unistd::{self, Gid, Uid};

use crate::utils;

use super::EntryMetadata;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A target directory that exists but does not have its final permission bits yet.
///
/// The mode of the reference directory is only applied by [`CreatedDir::finish`], which must run
/// after the directory has been populated.
#[derive(Debug)]
pub struct CreatedDir {
    path: PathBuf,
    reference: Option<EntryMetadata>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl CreatedDir {
    /// Returns the path of the created directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies the reference directory's permission bits.
    ///
    /// Best effort: a failure is logged at debug level and otherwise ignored.
    pub fn finish(self) {
        let Some(reference) = self.reference else {
            return;
        };

        let mode = reference.permissions();
        match fs::set_permissions(&self.path, fs::Permissions::from_mode(mode)) {
            Ok(()) => tracing::debug!(
                "Applied permissions to {}: {} ({:#o})",
                self.path.display(),
                utils::format_mode(mode),
                mode
            ),
            Err(e) => tracing::debug!(
                "Could not set permissions {:#o} on {}: {}",
                mode,
                self.path.display(),
                e
            ),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Creates the directory `target` and gives it the owner and group of `reference`.
///
/// Only the creation itself can fail. Cloning ownership is best effort, since an unprivileged
/// user usually cannot `chown`. The permission bits of `reference` are applied later through the
/// returned [`CreatedDir`].
pub fn create_dir(target: &Path, reference: &Path) -> io::Result<CreatedDir> {
    fs::create_dir(target)?;
    tracing::debug!("Created directory: {}", target.display());

    let reference = match fs::metadata(reference) {
        Ok(metadata) => {
            let metadata = EntryMetadata::from(&metadata);
            clone_owner(target, &metadata);
            Some(metadata)
        }
        Err(e) => {
            tracing::debug!(
                "Could not read metadata of {}, leaving defaults on {}: {}",
                reference.display(),
                target.display(),
                e
            );
            None
        }
    };

    Ok(CreatedDir {
        path: target.to_path_buf(),
        reference,
    })
}

/// Applies owner and group to a freshly created directory.
///
/// Runs before the mode is applied because `chown` may clear setuid/setgid bits.
fn clone_owner(target: &Path, metadata: &EntryMetadata) {
    let uid = Uid::from_raw(metadata.get_uid());
    let gid = Gid::from_raw(metadata.get_gid());
    if let Err(e) = unistd::chown(target, Some(uid), Some(gid)) {
        tracing::debug!(
            "Could not set owner {}:{} on {}: {}",
            uid,
            gid,
            target.display(),
            e
        );
    }
}

/// Hard-links the regular file `source` into place at `target`.
pub fn link_file(source: &Path, target: &Path) -> io::Result<()> {
    fs::hard_link(source, target)?;
    tracing::debug!(
        "Linked file: {} -> {}",
        target.display(),
        source.display()
    );

    Ok(())
}

/// Recreates the symlink `source` at `target`.
///
/// The new link points at the fully resolved absolute path of whatever `source` ultimately refers
/// to, not at the raw link text. A dangling or looping `source` is an error. Returns the resolved
/// destination.
pub fn link_symlink(source: &Path, target: &Path) -> io::Result<PathBuf> {
    let resolved = fs::canonicalize(source)?;
    symlink(&resolved, target)?;
    tracing::debug!(
        "Created symlink: {} -> {} (from {})",
        target.display(),
        resolved.display(),
        source.display()
    );

    Ok(resolved)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::os::unix::fs::MetadataExt;

    use tempfile::tempdir;

    use super::*;

    #[test_log::test]
    fn test_materialize_create_dir_clones_permissions_on_finish() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let reference = temp.path().join("reference");
        let target = temp.path().join("target");

        fs::create_dir(&reference)?;
        fs::set_permissions(&reference, fs::Permissions::from_mode(0o750))?;

        let created = create_dir(&target, &reference)?;
        assert_eq!(created.path(), target.as_path());
        created.finish();

        let metadata = fs::metadata(&target)?;
        assert!(metadata.is_dir());
        assert_eq!(metadata.permissions().mode() & 0o7777, 0o750);

        Ok(())
    }

    #[test_log::test]
    fn test_materialize_read_only_reference_stays_writable_until_finish() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let reference = temp.path().join("reference");
        let target = temp.path().join("target");

        fs::create_dir(&reference)?;
        fs::set_permissions(&reference, fs::Permissions::from_mode(0o555))?;

        let created = create_dir(&target, &reference)?;
        fs::write(target.join("child"), "written before finish")?;
        created.finish();

        assert_eq!(fs::metadata(&target)?.permissions().mode() & 0o7777, 0o555);
        assert_eq!(fs::read_to_string(target.join("child"))?, "written before finish");

        fs::set_permissions(&target, fs::Permissions::from_mode(0o755))?;
        fs::set_permissions(&reference, fs::Permissions::from_mode(0o755))?;
        Ok(())
    }

    #[test_log::test]
    fn test_materialize_create_dir_fails_when_taken() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let reference = temp.path().join("reference");
        let target = temp.path().join("target");

        fs::create_dir(&reference)?;
        fs::write(&target, "in the way")?;

        let err = create_dir(&target, &reference).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);

        Ok(())
    }

    #[test_log::test]
    fn test_materialize_create_dir_tolerates_missing_reference() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let target = temp.path().join("target");

        create_dir(&target, &temp.path().join("gone"))?.finish();
        assert!(target.is_dir());

        Ok(())
    }

    #[test_log::test]
    fn test_materialize_link_file_shares_inode() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let source = temp.path().join("source.txt");
        let target = temp.path().join("target.txt");
        fs::write(&source, "shared")?;

        link_file(&source, &target)?;

        assert_eq!(fs::metadata(&source)?.ino(), fs::metadata(&target)?.ino());
        assert_eq!(fs::metadata(&source)?.nlink(), 2);

        Ok(())
    }

    #[test_log::test]
    fn test_materialize_link_symlink_resolves_chain() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let real = temp.path().join("real.txt");
        let hop = temp.path().join("hop");
        let source = temp.path().join("source_link");
        let target = temp.path().join("target_link");

        fs::write(&real, "real")?;
        symlink(&real, &hop)?;
        symlink("hop", &source)?;

        let resolved = link_symlink(&source, &target)?;

        let expected = fs::canonicalize(&real)?;
        assert_eq!(resolved, expected);
        assert_eq!(fs::read_link(&target)?, expected);
        assert!(resolved.is_absolute());

        Ok(())
    }

    #[test_log::test]
    fn test_materialize_link_symlink_dangling_fails() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let source = temp.path().join("dangling");
        let target = temp.path().join("target_link");
        symlink(temp.path().join("nowhere"), &source)?;

        assert!(link_symlink(&source, &target).is_err());
        assert!(fs::symlink_metadata(&target).is_err());

        Ok(())
    }
}
