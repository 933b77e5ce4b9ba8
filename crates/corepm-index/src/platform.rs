//! Packages, platforms and platform releases.
//!
//! A package (for example `arduino`) ships one platform per architecture
//! (`avr`, `samd`, ...). Each platform carries its release history; a
//! release is an immutable snapshot with a board manifest, a list of tool
//! dependencies and the archive that holds its sources.

use std::fmt;

use crate::board::Board;
use crate::resource::Resource;
use crate::tool::{Tool, ToolDependency, ToolRelease};
use crate::version::Version;

/// One versioned snapshot of a platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRelease {
    /// Owning package name.
    pub package: String,
    /// Platform architecture.
    pub architecture: String,
    /// Human-readable platform name for this release.
    pub name: String,
    /// Release version.
    pub version: Version,
    /// Index category ("Arduino", "Contributed", ...).
    pub category: String,
    /// Boards supported by this release.
    pub boards: Vec<Board>,
    /// Tools this release needs.
    pub tool_dependencies: Vec<ToolDependency>,
    /// Archive holding the release.
    pub resource: Resource,
}

impl PlatformRelease {
    /// Create a release with an empty manifest.
    pub fn new(
        package: impl Into<String>,
        architecture: impl Into<String>,
        version: Version,
    ) -> Self {
        PlatformRelease {
            package: package.into(),
            architecture: architecture.into(),
            name: String::new(),
            version,
            category: String::new(),
            boards: Vec::new(),
            tool_dependencies: Vec::new(),
            resource: Resource::default(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a board to the manifest.
    pub fn with_board(mut self, board: Board) -> Self {
        self.boards.push(board);
        self
    }

    /// Add a tool dependency.
    pub fn with_tool_dependency(mut self, dependency: ToolDependency) -> Self {
        self.tool_dependencies.push(dependency);
        self
    }

    /// Set the release archive.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = resource;
        self
    }

    /// The `package:architecture` identifier of the owning platform.
    pub fn platform_id(&self) -> String {
        format!("{}:{}", self.package, self.architecture)
    }
}

impl fmt::Display for PlatformRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.package, self.architecture, self.version)
    }
}

/// A platform (one architecture of a package) and its release history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// Owning package name.
    pub package: String,
    /// Architecture, unique within the package.
    pub architecture: String,
    /// Releases in index order.
    pub releases: Vec<PlatformRelease>,
}

impl Platform {
    /// Create a platform with no releases.
    pub fn new(package: impl Into<String>, architecture: impl Into<String>) -> Self {
        Platform {
            package: package.into(),
            architecture: architecture.into(),
            releases: Vec::new(),
        }
    }

    /// Display name, taken from the latest release.
    pub fn name(&self) -> &str {
        self.latest_release().map(|r| r.name.as_str()).unwrap_or("")
    }

    /// The highest-versioned release, or `None` for an empty history.
    pub fn latest_release(&self) -> Option<&PlatformRelease> {
        self.releases.iter().max_by(|a, b| a.version.cmp(&b.version))
    }

    /// The release with exactly this version.
    pub fn release(&self, version: &Version) -> Option<&PlatformRelease> {
        self.releases.iter().find(|r| &r.version == version)
    }

    /// Add a release. Returns `false` if the version is already present.
    pub fn add_release(&mut self, release: PlatformRelease) -> bool {
        if self.release(&release.version).is_some() {
            return false;
        }
        self.releases.push(release);
        true
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package, self.architecture)
    }
}

/// A package: a publisher of platforms and tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Package name (the `PACKAGER` part of a reference).
    pub name: String,
    /// Maintainer name.
    pub maintainer: Option<String>,
    /// Project website.
    pub website_url: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Platforms in index order.
    pub platforms: Vec<Platform>,
    /// Tools in index order.
    pub tools: Vec<Tool>,
}

impl Package {
    /// Create an empty package.
    pub fn new(name: impl Into<String>) -> Self {
        Package {
            name: name.into(),
            maintainer: None,
            website_url: None,
            email: None,
            platforms: Vec::new(),
            tools: Vec::new(),
        }
    }

    /// Find a platform by architecture.
    pub fn platform(&self, architecture: &str) -> Option<&Platform> {
        self.platforms
            .iter()
            .find(|p| p.architecture == architecture)
    }

    /// Find a tool by name.
    pub fn tool(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Add a platform release, creating its platform on first sight.
    ///
    /// Returns `false` if a release with the same version already exists.
    pub fn add_platform_release(&mut self, release: PlatformRelease) -> bool {
        let index = match self
            .platforms
            .iter()
            .position(|p| p.architecture == release.architecture)
        {
            Some(index) => index,
            None => {
                self.platforms
                    .push(Platform::new(&self.name, &release.architecture));
                self.platforms.len() - 1
            }
        };
        self.platforms[index].add_release(release)
    }

    /// Add a tool release, creating its tool on first sight.
    ///
    /// Returns `false` if a release with the same version already exists.
    pub fn add_tool_release(&mut self, release: ToolRelease) -> bool {
        let index = match self.tools.iter().position(|t| t.name == release.name) {
            Some(index) => index,
            None => {
                self.tools.push(Tool::new(&self.name, &release.name));
                self.tools.len() - 1
            }
        };
        let tool = &mut self.tools[index];
        if tool.release(&release.version).is_some() {
            return false;
        }
        tool.releases.push(release);
        true
    }

    /// Add a platform release (builder form, for fixtures).
    pub fn with_platform_release(mut self, release: PlatformRelease) -> Self {
        self.add_platform_release(release);
        self
    }

    /// Add a tool release (builder form, for fixtures).
    pub fn with_tool_release(mut self, release: ToolRelease) -> Self {
        self.add_tool_release(release);
        self
    }
}
