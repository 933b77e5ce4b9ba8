//! The fetch primitive seam.
//!
//! A [`Fetcher`] turns an artifact descriptor into one of three outcomes:
//! the archive is already present, a transfer has been started, or the
//! request could not be made at all. Started transfers are driven to
//! completion by the caller, which observes progress along the way.

use std::path::PathBuf;

use serde::Serialize;

use corepm_index::{Flavour, PlatformRelease, Resource, ToolRelease};

use crate::error::FetchError;

/// What kind of item an artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// A host-specific tool build.
    Tool,
    /// A platform release archive.
    Platform,
}

/// Something to fetch.
#[derive(Debug, Clone)]
pub struct Artifact<'a> {
    /// Item kind; tools and platforms are cached separately.
    pub kind: ArtifactKind,
    /// Display label of the item (`package:name@version`).
    pub label: String,
    /// Declared archive.
    pub resource: &'a Resource,
}

impl<'a> Artifact<'a> {
    /// The artifact for one flavour of a tool release.
    pub fn tool(release: &ToolRelease, flavour: &'a Flavour) -> Self {
        Artifact {
            kind: ArtifactKind::Tool,
            label: release.to_string(),
            resource: &flavour.resource,
        }
    }

    /// The artifact for a platform release.
    pub fn platform(release: &'a PlatformRelease) -> Self {
        Artifact {
            kind: ArtifactKind::Platform,
            label: release.to_string(),
            resource: &release.resource,
        }
    }
}

/// A transfer in progress.
pub trait Transfer {
    /// Total bytes expected, if known up front.
    fn total_size(&self) -> Option<u64>;

    /// Run the transfer to its end, calling `progress` with the cumulative
    /// byte count as data arrives. Returns where the archive was stored.
    fn complete(self: Box<Self>, progress: &mut dyn FnMut(u64)) -> Result<PathBuf, FetchError>;
}

/// Result of asking a [`Fetcher`] for an artifact.
pub enum FetchOutcome {
    /// A content-identical archive is already cached; nothing to do.
    AlreadyPresent,
    /// A live transfer has been started.
    InProgress(Box<dyn Transfer>),
    /// The request could not be made.
    Failed(FetchError),
}

impl std::fmt::Debug for FetchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchOutcome::AlreadyPresent => f.write_str("AlreadyPresent"),
            FetchOutcome::InProgress(_) => f.write_str("InProgress(..)"),
            FetchOutcome::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

/// Abstract fetch backend.
pub trait Fetcher {
    /// Start fetching an artifact.
    fn fetch(&self, artifact: &Artifact<'_>) -> FetchOutcome;
}

/// Fetch the archive of one flavour of a tool release.
pub fn fetch_tool_release(
    fetcher: &dyn Fetcher,
    release: &ToolRelease,
    flavour: &Flavour,
) -> FetchOutcome {
    fetcher.fetch(&Artifact::tool(release, flavour))
}

/// Fetch the archive of a platform release.
pub fn fetch_platform_release(fetcher: &dyn Fetcher, release: &PlatformRelease) -> FetchOutcome {
    fetcher.fetch(&Artifact::platform(release))
}

#[cfg(test)]
mod tests {
    use super::*;
    use corepm_index::Version;

    #[test]
    fn artifact_labels() {
        let flavour = Flavour::new("all", Resource::new("http://h/t.zip", "t.zip"));
        let tool = ToolRelease::new("arduino", "bossac", Version::parse("1.7.0").unwrap())
            .with_flavour(flavour.clone());
        let artifact = Artifact::tool(&tool, &tool.flavours[0]);
        assert_eq!(artifact.kind, ArtifactKind::Tool);
        assert_eq!(artifact.label, "arduino:bossac@1.7.0");
        assert_eq!(artifact.resource.archive_file_name, "t.zip");

        let release = PlatformRelease::new("arduino", "samd", Version::parse("1.6.9").unwrap())
            .with_resource(Resource::new("http://h/samd.tar.bz2", "samd.tar.bz2"));
        let artifact = Artifact::platform(&release);
        assert_eq!(artifact.kind, ArtifactKind::Platform);
        assert_eq!(artifact.label, "arduino:samd@1.6.9");
    }
}
