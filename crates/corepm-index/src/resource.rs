//! Downloadable archive descriptors.

use serde::Serialize;

/// A downloadable archive as declared in the package index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Where to fetch the archive from.
    pub url: String,
    /// File name the archive is stored under once downloaded.
    pub archive_file_name: String,
    /// Declared checksum in `ALGO:hex` form (may be empty).
    pub checksum: String,
    /// Declared size in bytes (0 when unknown).
    pub size: u64,
}

impl Resource {
    /// Create a resource descriptor.
    pub fn new(url: impl Into<String>, archive_file_name: impl Into<String>) -> Self {
        Resource {
            url: url.into(),
            archive_file_name: archive_file_name.into(),
            checksum: String::new(),
            size: 0,
        }
    }

    /// Set the declared checksum.
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = checksum.into();
        self
    }

    /// Set the declared size.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }
}
