//! The in-memory package catalog.
//!
//! Built once per command from the index files in the data directory:
//!
//! ```text
//! <data_dir>/
//!   package_index.json          - primary index (required)
//!   package_<name>_index.json   - additional indexes, loaded in name order
//! ```
//!
//! Packages are kept in load order and platforms in index order; search
//! results follow this order.

use std::path::{Path, PathBuf};

use crate::error::{IndexError, Result};
use crate::index_file::IndexFile;
use crate::platform::Package;
use crate::tool::ToolRelease;
use crate::version::Version;

/// File name of the primary package index.
pub const PRIMARY_INDEX: &str = "package_index.json";

/// Read-only index of every known package.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    packages: Vec<Package>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Create a catalog from already-built packages.
    pub fn from_packages(packages: Vec<Package>) -> Self {
        Catalog { packages }
    }

    /// Load the primary index and every additional index from `data_dir`.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let primary = data_dir.join(PRIMARY_INDEX);
        if !primary.is_file() {
            return Err(IndexError::MissingIndex { path: primary });
        }

        let mut catalog = Catalog::new();
        catalog.load_index_file(&primary)?;
        for path in additional_indexes(data_dir)? {
            catalog.load_index_file(&path)?;
        }

        tracing::debug!(
            packages = catalog.packages.len(),
            dir = %data_dir.display(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse one index file and merge it into the catalog.
    pub fn load_index_file(&mut self, path: &Path) -> Result<()> {
        tracing::info!("Loading package index {}", path.display());
        let data = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let index = IndexFile::parse(&data).map_err(|source| IndexError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_index(&index)
    }

    /// Merge a parsed index document into the catalog.
    pub fn merge_index(&mut self, index: &IndexFile) -> Result<()> {
        for entry in &index.packages {
            let position = match self.packages.iter().position(|p| p.name == entry.name) {
                Some(position) => position,
                None => {
                    self.packages.push(Package::new(&entry.name));
                    self.packages.len() - 1
                }
            };
            entry.merge_into(&mut self.packages[position])?;
        }
        Ok(())
    }

    /// All packages in load order.
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Find a package by name.
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.name == name)
    }

    /// Find the release of tool `packager:name` with exactly `version`.
    pub fn find_tool_release(
        &self,
        packager: &str,
        name: &str,
        version: &Version,
    ) -> Option<&ToolRelease> {
        self.package(packager)?.tool(name)?.release(version)
    }
}

/// List `package_*_index.json` files (other than the primary) in name order.
fn additional_indexes(data_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(data_dir).map_err(|source| IndexError::Io {
        path: data_dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IndexError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if file_name != PRIMARY_INDEX
            && file_name.starts_with("package_")
            && file_name.ends_with("_index.json")
            && path.is_file()
        {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    const PRIMARY: &str = r#"{ "packages": [
      { "name": "arduino",
        "platforms": [
          { "name": "Arduino AVR Boards", "architecture": "avr", "version": "1.6.20" },
          { "name": "Arduino SAMD Boards", "architecture": "samd", "version": "1.6.9" }
        ],
        "tools": [ { "name": "bossac", "version": "1.7.0", "systems": [] } ] }
    ] }"#;

    const THIRD_PARTY: &str = r#"{ "packages": [
      { "name": "esp8266",
        "platforms": [ { "name": "esp8266", "architecture": "esp8266", "version": "2.4.0" } ] },
      { "name": "arduino",
        "platforms": [ { "name": "Arduino SAMD Boards", "architecture": "samd", "version": "1.6.18" } ] }
    ] }"#;

    #[test]
    fn load_primary_and_additional() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), PRIMARY_INDEX, PRIMARY);
        write(dir.path(), "package_esp8266com_index.json", THIRD_PARTY);
        write(dir.path(), "unrelated.json", "not json");

        let catalog = Catalog::load_from_dir(dir.path()).unwrap();
        let names: Vec<&str> = catalog.packages().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["arduino", "esp8266"]);

        let samd = catalog.package("arduino").unwrap().platform("samd").unwrap();
        assert_eq!(samd.releases.len(), 2);
        assert_eq!(samd.latest_release().unwrap().version.as_str(), "1.6.18");
    }

    #[test]
    fn missing_primary_index() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, IndexError::MissingIndex { .. }));
    }

    #[test]
    fn malformed_index_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), PRIMARY_INDEX, "{ \"packages\": [ ");
        let err = Catalog::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, IndexError::Parse { .. }));
    }

    #[test]
    fn find_tool_release() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), PRIMARY_INDEX, PRIMARY);
        let catalog = Catalog::load_from_dir(dir.path()).unwrap();

        let version = Version::parse("1.7.0").unwrap();
        assert!(catalog.find_tool_release("arduino", "bossac", &version).is_some());
        assert!(catalog.find_tool_release("arduino", "avrdude", &version).is_none());
        assert!(catalog.find_tool_release("other", "bossac", &version).is_none());
    }

    #[test]
    fn empty_catalog() {
        let catalog = Catalog::new();
        assert!(catalog.packages().is_empty());
        assert!(catalog.package("arduino").is_none());
    }
}
