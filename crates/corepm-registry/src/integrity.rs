//! Content hashing for cached archives.
//!
//! Index entries declare checksums as `ALGO:hex` (for example
//! `SHA-256:3f2a...`). The cache uses them to decide whether an archive on
//! disk is the one the index describes.

use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

/// A content hash (SHA-256 hex digest).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Compute the SHA-256 hash of the given data.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        ContentHash(hex_encode(&hasher.finalize()))
    }

    /// Compute the SHA-256 hash of everything `reader` yields.
    pub fn compute_reader(mut reader: impl Read) -> std::io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 16 * 1024];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(ContentHash(hex_encode(&hasher.finalize())))
    }

    /// Compute the SHA-256 hash of a file.
    pub fn compute_file(path: &Path) -> std::io::Result<Self> {
        ContentHash::compute_reader(std::fs::File::open(path)?)
    }

    /// Get the hex string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encode bytes as lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// A checksum declaration from the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    /// Algorithm name as written (`SHA-256`, `MD5`, ...).
    pub algorithm: String,
    /// Expected digest, lowercased.
    pub digest: String,
}

impl Checksum {
    /// Parse an `ALGO:hex` declaration. Empty or malformed input yields `None`.
    pub fn parse(declared: &str) -> Option<Self> {
        let (algorithm, digest) = declared.trim().split_once(':')?;
        if algorithm.is_empty() || digest.is_empty() {
            return None;
        }
        Some(Checksum {
            algorithm: algorithm.to_string(),
            digest: digest.to_ascii_lowercase(),
        })
    }

    /// Whether this crate can compute the declared algorithm.
    pub fn is_supported(&self) -> bool {
        self.algorithm.eq_ignore_ascii_case("SHA-256")
    }

    /// Check a file against the declaration.
    ///
    /// Returns `None` when the algorithm is not supported.
    pub fn matches_file(&self, path: &Path) -> std::io::Result<Option<bool>> {
        if !self.is_supported() {
            return Ok(None);
        }
        let actual = ContentHash::compute_file(path)?;
        Ok(Some(actual.as_str() == self.digest))
    }
}
