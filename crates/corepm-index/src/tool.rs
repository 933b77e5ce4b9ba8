//! Tools required by platform releases.

use std::fmt;

use serde::Serialize;

use crate::host::HostPlatform;
use crate::resource::Resource;
use crate::version::Version;

/// A reference from a platform release to the tool release it needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ToolDependency {
    /// Package that publishes the tool.
    pub packager: String,
    /// Tool name.
    pub name: String,
    /// Exact tool version.
    pub version: Version,
}

impl ToolDependency {
    /// Create a dependency reference.
    pub fn new(packager: impl Into<String>, name: impl Into<String>, version: Version) -> Self {
        ToolDependency {
            packager: packager.into(),
            name: name.into(),
            version,
        }
    }
}

impl fmt::Display for ToolDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.packager, self.name, self.version)
    }
}

/// One host-specific build of a tool release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flavour {
    /// Host triple the build targets (`x86_64-linux-gnu`, `i686-mingw32`, `all`, ...).
    pub host: String,
    /// Archive holding the build.
    pub resource: Resource,
}

impl Flavour {
    /// Create a flavour.
    pub fn new(host: impl Into<String>, resource: Resource) -> Self {
        Flavour {
            host: host.into(),
            resource,
        }
    }

    /// Whether this build runs on `host`.
    pub fn is_compatible_with(&self, host: &HostPlatform) -> bool {
        host.is_compatible(&self.host)
    }
}

/// A versioned release of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolRelease {
    /// Package that publishes the tool.
    pub package: String,
    /// Tool name.
    pub name: String,
    /// Release version.
    pub version: Version,
    /// Host-specific builds.
    pub flavours: Vec<Flavour>,
}

impl ToolRelease {
    /// Create a tool release with no flavours.
    pub fn new(package: impl Into<String>, name: impl Into<String>, version: Version) -> Self {
        ToolRelease {
            package: package.into(),
            name: name.into(),
            version,
            flavours: Vec::new(),
        }
    }

    /// Add a flavour.
    pub fn with_flavour(mut self, flavour: Flavour) -> Self {
        self.flavours.push(flavour);
        self
    }

    /// The first flavour that runs on `host`, if any.
    pub fn compatible_flavour(&self, host: &HostPlatform) -> Option<&Flavour> {
        self.flavours.iter().find(|f| f.is_compatible_with(host))
    }
}

impl fmt::Display for ToolRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.package, self.name, self.version)
    }
}

/// A named tool and its release history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    /// Package that publishes the tool.
    pub package: String,
    /// Tool name.
    pub name: String,
    /// Releases in index order.
    pub releases: Vec<ToolRelease>,
}

impl Tool {
    /// Create a tool with no releases.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Tool {
            package: package.into(),
            name: name.into(),
            releases: Vec::new(),
        }
    }

    /// Find the release with the given version.
    pub fn release(&self, version: &Version) -> Option<&ToolRelease> {
        self.releases.iter().find(|r| &r.version == version)
    }

    /// The highest-versioned release, if any.
    pub fn latest_release(&self) -> Option<&ToolRelease> {
        self.releases.iter().max_by(|a, b| a.version.cmp(&b.version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn bossac() -> ToolRelease {
        ToolRelease::new("arduino", "bossac", v("1.7.0"))
            .with_flavour(Flavour::new(
                "i686-mingw32",
                Resource::new("http://example.com/bossac-win.zip", "bossac-win.zip"),
            ))
            .with_flavour(Flavour::new(
                "x86_64-linux-gnu",
                Resource::new("http://example.com/bossac-linux64.tgz", "bossac-linux64.tgz"),
            ))
    }

    #[test]
    fn compatible_flavour_for_linux() {
        let tool = bossac();
        let flavour = tool
            .compatible_flavour(&HostPlatform::new("linux", "x86_64"))
            .unwrap();
        assert_eq!(flavour.resource.archive_file_name, "bossac-linux64.tgz");
    }

    #[test]
    fn no_flavour_for_unsupported_host() {
        let tool = bossac();
        assert!(tool
            .compatible_flavour(&HostPlatform::new("macos", "aarch64"))
            .is_none());
    }

    #[test]
    fn tool_release_display() {
        assert_eq!(bossac().to_string(), "arduino:bossac@1.7.0");
        let dep = ToolDependency::new("arduino", "bossac", v("1.7.0"));
        assert_eq!(dep.to_string(), "arduino:bossac@1.7.0");
    }

    #[test]
    fn tool_release_lookup() {
        let mut tool = Tool::new("arduino", "bossac");
        tool.releases.push(ToolRelease::new("arduino", "bossac", v("1.6.1")));
        tool.releases.push(ToolRelease::new("arduino", "bossac", v("1.7.0")));

        assert!(tool.release(&v("1.6.1")).is_some());
        assert!(tool.release(&v("1.6.2")).is_none());
        assert_eq!(tool.latest_release().unwrap().version, v("1.7.0"));
    }
}
