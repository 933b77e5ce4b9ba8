//! Local download cache.
//!
//! Stores fetched archives under the downloads directory, split by kind.
//!
//! Layout:
//! ```text
//! <downloads>/
//!   packages/
//!     samd-1.6.9.tar.bz2      - platform release archives
//!   tools/
//!     bossac-1.7.0-x86_64-linux-gnu.tar.gz
//! ```
//!
//! An archive counts as already downloaded when it exists, its size equals
//! the declared size and, for SHA-256 declarations, its digest matches.

use std::path::{Path, PathBuf};

use corepm_index::Resource;

use crate::error::FetchError;
use crate::fetch::ArtifactKind;
use crate::integrity::Checksum;

/// A download cache backed by the filesystem.
#[derive(Debug, Clone)]
pub struct DownloadCache {
    /// Root directory for the cache.
    root: PathBuf,
}

impl DownloadCache {
    /// Create a cache rooted at the given directory.
    pub fn new(root: PathBuf) -> Self {
        DownloadCache { root }
    }

    /// Directory holding archives of the given kind.
    pub fn kind_dir(&self, kind: ArtifactKind) -> PathBuf {
        match kind {
            ArtifactKind::Platform => self.root.join("packages"),
            ArtifactKind::Tool => self.root.join("tools"),
        }
    }

    /// Where an archive is stored.
    ///
    /// Rejects names that are empty or would land outside the cache.
    pub fn archive_path(&self, kind: ArtifactKind, file_name: &str) -> Result<PathBuf, FetchError> {
        if file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\'])
        {
            return Err(FetchError::InvalidArchiveName {
                name: file_name.to_string(),
            });
        }
        Ok(self.kind_dir(kind).join(file_name))
    }

    /// Whether a content-identical copy of `resource` is already cached.
    pub fn contains(&self, kind: ArtifactKind, resource: &Resource) -> Result<bool, FetchError> {
        let path = self.archive_path(kind, &resource.archive_file_name)?;
        if !path.is_file() {
            return Ok(false);
        }

        let cache_err = |source| FetchError::Cache {
            path: path.clone(),
            source,
        };

        if resource.size > 0 {
            let actual = std::fs::metadata(&path).map_err(cache_err)?.len();
            if actual != resource.size {
                tracing::debug!(
                    path = %path.display(),
                    expected = resource.size,
                    actual,
                    "cached archive has wrong size"
                );
                return Ok(false);
            }
        }

        if let Some(checksum) = Checksum::parse(&resource.checksum) {
            if checksum.matches_file(&path).map_err(cache_err)? == Some(false) {
                tracing::debug!(path = %path.display(), "cached archive has wrong checksum");
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Create the directory for archives of the given kind.
    pub fn ensure_dir(&self, kind: ArtifactKind) -> Result<PathBuf, FetchError> {
        let dir = self.kind_dir(kind);
        std::fs::create_dir_all(&dir).map_err(|source| FetchError::Cache {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }
}

/// The temporary file a transfer writes into before it is moved into place.
pub fn partial_path(archive: &Path) -> PathBuf {
    let mut name = archive.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    archive.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrity::ContentHash;

    fn resource(name: &str, data: &[u8]) -> Resource {
        Resource::new(format!("http://example.com/{name}"), name)
            .with_size(data.len() as u64)
            .with_checksum(format!("SHA-256:{}", ContentHash::compute(data)))
    }

    fn store(cache: &DownloadCache, kind: ArtifactKind, name: &str, data: &[u8]) {
        let dir = cache.ensure_dir(kind).unwrap();
        std::fs::write(dir.join(name), data).unwrap();
    }

    #[test]
    fn missing_archive_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DownloadCache::new(dir.path().to_path_buf());
        let res = resource("samd.tar.bz2", b"data");
        assert!(!cache.contains(ArtifactKind::Platform, &res).unwrap());
    }

    #[test]
    fn identical_archive_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DownloadCache::new(dir.path().to_path_buf());
        store(&cache, ArtifactKind::Platform, "samd.tar.bz2", b"data");

        let res = resource("samd.tar.bz2", b"data");
        assert!(cache.contains(ArtifactKind::Platform, &res).unwrap());
        // Kinds are kept apart.
        assert!(!cache.contains(ArtifactKind::Tool, &res).unwrap());
    }

    #[test]
    fn wrong_size_or_checksum_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DownloadCache::new(dir.path().to_path_buf());
        store(&cache, ArtifactKind::Tool, "short.zip", b"dat");
        store(&cache, ArtifactKind::Tool, "tampered.zip", b"DATA");

        assert!(!cache
            .contains(ArtifactKind::Tool, &resource("short.zip", b"data"))
            .unwrap());
        assert!(!cache
            .contains(ArtifactKind::Tool, &resource("tampered.zip", b"data"))
            .unwrap());
    }

    #[test]
    fn undeclared_checksum_relies_on_size() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DownloadCache::new(dir.path().to_path_buf());
        store(&cache, ArtifactKind::Tool, "t.zip", b"data");

        let res = Resource::new("http://example.com/t.zip", "t.zip").with_size(4);
        assert!(cache.contains(ArtifactKind::Tool, &res).unwrap());
    }

    #[test]
    fn rejects_escaping_names() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DownloadCache::new(dir.path().to_path_buf());
        for name in ["", "..", "../evil.zip", "sub/dir.zip", "c:\\x.zip"] {
            assert!(
                cache.archive_path(ArtifactKind::Tool, name).is_err(),
                "{name} accepted"
            );
        }
        assert_eq!(
            cache.archive_path(ArtifactKind::Platform, "a.tar.bz2").unwrap(),
            dir.path().join("packages").join("a.tar.bz2")
        );
    }

    #[test]
    fn partial_path_appends_suffix() {
        assert_eq!(
            partial_path(Path::new("/tmp/packages/samd.tar.bz2")),
            PathBuf::from("/tmp/packages/samd.tar.bz2.part")
        );
    }
}
