//! On-disk package index schema.
//!
//! Index files are JSON documents listing packages with their platform
//! releases and tool releases:
//!
//! ```json
//! { "packages": [ {
//!     "name": "arduino",
//!     "platforms": [ { "name": "Arduino SAMD Boards", "architecture": "samd",
//!                      "version": "1.6.9", "url": "...", "archiveFileName": "...",
//!                      "checksum": "SHA-256:...", "size": "123",
//!                      "boards": [ { "name": "Arduino MKRZero",
//!                                    "usb": [ { "vid": "0x2341", "pid": "0x804f" } ] } ],
//!                      "toolsDependencies": [ { "packager": "arduino",
//!                                               "name": "bossac", "version": "1.7.0" } ] } ],
//!     "tools": [ { "name": "bossac", "version": "1.7.0",
//!                  "systems": [ { "host": "x86_64-linux-gnu", "url": "...",
//!                                 "archiveFileName": "...", "checksum": "...", "size": "..." } ] } ]
//! } ] }
//! ```
//!
//! Sizes appear both as strings and as numbers in published indexes; both
//! are accepted.

use serde::{Deserialize, Deserializer};

use crate::board::{Board, UsbId};
use crate::error::{IndexError, Result};
use crate::platform::{Package, PlatformRelease};
use crate::resource::Resource;
use crate::tool::{Flavour, ToolDependency, ToolRelease};
use crate::version::Version;

/// A whole index document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexFile {
    /// Packages in document order.
    #[serde(default)]
    pub packages: Vec<IndexPackage>,
}

/// A package entry.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexPackage {
    pub name: String,
    #[serde(default)]
    pub maintainer: Option<String>,
    #[serde(default, rename = "websiteURL")]
    pub website_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub platforms: Vec<IndexPlatformRelease>,
    #[serde(default)]
    pub tools: Vec<IndexToolRelease>,
}

/// A platform release entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexPlatformRelease {
    #[serde(default)]
    pub name: String,
    pub architecture: String,
    pub version: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub archive_file_name: String,
    #[serde(default)]
    pub checksum: String,
    #[serde(default, deserialize_with = "size_from_string_or_number")]
    pub size: u64,
    #[serde(default)]
    pub boards: Vec<IndexBoard>,
    #[serde(default)]
    pub tools_dependencies: Vec<IndexToolDependency>,
}

/// A board entry.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexBoard {
    pub name: String,
    #[serde(default)]
    pub usb: Vec<IndexUsbId>,
}

/// A USB identifier entry.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexUsbId {
    pub vid: String,
    pub pid: String,
}

/// A tool dependency entry.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexToolDependency {
    pub packager: String,
    pub name: String,
    pub version: String,
}

/// A tool release entry.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexToolRelease {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub systems: Vec<IndexFlavour>,
}

/// A host-specific tool build entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexFlavour {
    pub host: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub archive_file_name: String,
    #[serde(default)]
    pub checksum: String,
    #[serde(default, deserialize_with = "size_from_string_or_number")]
    pub size: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeField {
    Number(u64),
    Text(String),
}

fn size_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match SizeField::deserialize(deserializer)? {
        SizeField::Number(n) => Ok(n),
        SizeField::Text(s) if s.trim().is_empty() => Ok(0),
        SizeField::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl IndexFile {
    /// Parse an index document from JSON text.
    pub fn parse(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl IndexPackage {
    /// Merge this entry into `package`.
    ///
    /// Releases whose version is already present are skipped, so the first
    /// index to declare a release wins.
    pub fn merge_into(&self, package: &mut Package) -> Result<()> {
        if package.maintainer.is_none() {
            package.maintainer = self.maintainer.clone();
        }
        if package.website_url.is_none() {
            package.website_url = self.website_url.clone();
        }
        if package.email.is_none() {
            package.email = self.email.clone();
        }

        for entry in &self.platforms {
            let release = entry.to_release(&self.name)?;
            if !package.add_platform_release(release) {
                tracing::debug!(
                    package = %self.name,
                    architecture = %entry.architecture,
                    version = %entry.version,
                    "skipping duplicate platform release"
                );
            }
        }

        for entry in &self.tools {
            let release = entry.to_release(&self.name)?;
            if !package.add_tool_release(release) {
                tracing::debug!(
                    package = %self.name,
                    tool = %entry.name,
                    version = %entry.version,
                    "skipping duplicate tool release"
                );
            }
        }

        Ok(())
    }
}

impl IndexPlatformRelease {
    fn to_release(&self, package: &str) -> Result<PlatformRelease> {
        let item = format!("platform {package}:{}", self.architecture);
        let version = parse_version(&self.version, &item)?;

        let boards = self
            .boards
            .iter()
            .map(IndexBoard::to_board)
            .collect::<Result<Vec<_>>>()?;

        let tool_dependencies = self
            .tools_dependencies
            .iter()
            .map(|dep| {
                let item = format!("tool dependency {}:{}", dep.packager, dep.name);
                Ok(ToolDependency::new(
                    &dep.packager,
                    &dep.name,
                    parse_version(&dep.version, &item)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PlatformRelease {
            package: package.to_string(),
            architecture: self.architecture.clone(),
            name: self.name.clone(),
            version,
            category: self.category.clone(),
            boards,
            tool_dependencies,
            resource: Resource {
                url: self.url.clone(),
                archive_file_name: self.archive_file_name.clone(),
                checksum: self.checksum.clone(),
                size: self.size,
            },
        })
    }
}

impl IndexBoard {
    fn to_board(&self) -> Result<Board> {
        let mut board = Board::new(&self.name);
        for id in &self.usb {
            let usb_id = UsbId::new(&id.vid, &id.pid).ok_or_else(|| IndexError::InvalidUsbId {
                board: self.name.clone(),
                value: format!("{}:{}", id.vid, id.pid),
            })?;
            board.usb_ids.push(usb_id);
        }
        Ok(board)
    }
}

impl IndexToolRelease {
    fn to_release(&self, package: &str) -> Result<ToolRelease> {
        let item = format!("tool {package}:{}", self.name);
        let mut release = ToolRelease::new(package, &self.name, parse_version(&self.version, &item)?);
        for system in &self.systems {
            release.flavours.push(Flavour::new(
                &system.host,
                Resource {
                    url: system.url.clone(),
                    archive_file_name: system.archive_file_name.clone(),
                    checksum: system.checksum.clone(),
                    size: system.size,
                },
            ));
        }
        Ok(release)
    }
}

fn parse_version(raw: &str, item: &str) -> Result<Version> {
    Version::parse(raw).map_err(|source| IndexError::InvalidVersion {
        item: item.to_string(),
        version: raw.to_string(),
        source,
    })
}
