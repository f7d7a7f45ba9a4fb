use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{utils, MonomergeError, MonomergeResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An overlay manifest, usually stored as `monomerge.toml`.
///
/// ```toml
/// target = "composite"
/// sources = ["overlay/site", "overlay/base"]
/// ```
///
/// Both keys are optional so that either can be supplied on the command line instead.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OverlayManifest {
    /// The directory to create the composite tree in.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub target: Option<PathBuf>,

    /// Source roots, highest priority first.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sources: Option<Vec<PathBuf>>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl OverlayManifest {
    /// Reads a manifest from `path`.
    ///
    /// Relative paths inside the manifest are resolved against the directory containing it.
    pub fn load(path: impl AsRef<Path>) -> MonomergeResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| MonomergeError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

        let manifest = Self::parse(&contents).map_err(|source| MonomergeError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        tracing::debug!("Loaded manifest {}", path.display());

        Ok(manifest.relative_to(base))
    }

    /// Returns the path of the default manifest in `dir`, if there is one.
    pub fn find_in(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let path = dir.as_ref().join(utils::MANIFEST_FILENAME);
        path.is_file().then_some(path)
    }

    /// Parses a manifest from TOML text without touching the filesystem.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Resolves every relative path in the manifest against `base`.
    pub fn relative_to(self, base: &Path) -> Self {
        Self {
            target: self
                .target
                .map(|target| utils::resolve_against(base, &target)),
            sources: self.sources.map(|sources| {
                sources
                    .iter()
                    .map(|source| utils::resolve_against(base, source))
                    .collect()
            }),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_manifest_parse_full() -> anyhow::Result<()> {
        let manifest = OverlayManifest::parse(
            r#"
            target = "composite"
            sources = ["site", "/srv/base"]
            "#,
        )?;

        assert_eq!(manifest.target, Some(PathBuf::from("composite")));
        assert_eq!(
            manifest.sources,
            Some(vec![PathBuf::from("site"), PathBuf::from("/srv/base")])
        );
        Ok(())
    }

    #[test]
    fn test_manifest_parse_rejects_unknown_keys() {
        assert!(OverlayManifest::parse("targets = \"x\"").is_err());
    }

    #[test]
    fn test_manifest_load_resolves_relative_paths() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join(utils::MANIFEST_FILENAME);
        fs::write(
            &path,
            "target = \"out\"\nsources = [\"site\", \"/srv/base\"]\n",
        )?;

        let manifest = OverlayManifest::load(&path)?;

        assert_eq!(manifest.target, Some(temp.path().join("out")));
        assert_eq!(
            manifest.sources,
            Some(vec![temp.path().join("site"), PathBuf::from("/srv/base")])
        );
        Ok(())
    }

    #[test]
    fn test_manifest_find_in() -> anyhow::Result<()> {
        let temp = tempdir()?;
        assert_eq!(OverlayManifest::find_in(temp.path()), None);

        let path = temp.path().join(utils::MANIFEST_FILENAME);
        fs::write(&path, "")?;
        assert_eq!(OverlayManifest::find_in(temp.path()), Some(path));
        Ok(())
    }

    #[test]
    fn test_manifest_load_reports_missing_file() {
        let err = OverlayManifest::load("/definitely/not/here/monomerge.toml").unwrap_err();
        assert!(matches!(err, MonomergeError::ManifestRead { .. }));
    }

    #[test]
    fn test_manifest_load_reports_parse_error() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join(utils::MANIFEST_FILENAME);
        fs::write(&path, "sources = 42")?;

        let err = OverlayManifest::load(&path).unwrap_err();
        assert!(matches!(err, MonomergeError::ManifestParse { .. }));
        Ok(())
    }
}
