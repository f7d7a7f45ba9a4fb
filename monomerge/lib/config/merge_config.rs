use std::path::PathBuf;

use getset::Getters;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{MonomergeError, MonomergeResult};

use super::OverlayManifest;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A fully resolved merge: which sources to merge, in which order, and where to.
///
/// ## Examples
///
/// ```
/// use monomerge::config::MergeConfig;
///
/// let config = MergeConfig::builder()
///     .sources(vec!["overlay/site".into(), "overlay/base".into()])
///     .target("composite")
///     .build();
///
/// assert_eq!(config.get_sources().len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder, PartialEq, Eq, Getters)]
#[getset(get = "pub with_prefix")]
pub struct MergeConfig {
    /// Source roots, highest priority first.
    pub(super) sources: Vec<PathBuf>,

    /// The directory to create the composite tree in. Must not exist yet.
    #[builder(setter(into))]
    pub(super) target: PathBuf,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MergeConfig {
    /// Combines command-line settings with an optional manifest.
    ///
    /// Command-line values take precedence. Sources given on the command line replace the
    /// manifest's sources rather than being appended to them.
    pub fn resolve(
        sources: Vec<PathBuf>,
        target: Option<PathBuf>,
        manifest: Option<OverlayManifest>,
    ) -> MonomergeResult<Self> {
        let (manifest_sources, manifest_target) = match manifest {
            Some(manifest) => (manifest.sources, manifest.target),
            None => (None, None),
        };

        let sources = if sources.is_empty() {
            manifest_sources.unwrap_or_default()
        } else {
            sources
        };

        if sources.is_empty() {
            return Err(MonomergeError::MissingSetting("sources"));
        }

        let target = target
            .or(manifest_target)
            .ok_or(MonomergeError::MissingSetting("target"))?;

        Ok(Self { sources, target })
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
