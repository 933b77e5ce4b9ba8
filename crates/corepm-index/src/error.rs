//! Index error types.

use std::path::PathBuf;

/// Errors that can occur while loading the package index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The primary index file is missing from the data directory.
    #[error("package index not found at {}", path.display())]
    MissingIndex { path: PathBuf },

    /// An index file could not be read.
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An index file is not valid JSON or does not follow the schema.
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A release or tool declares a version that cannot be parsed.
    #[error("invalid version '{version}' for {item}")]
    InvalidVersion {
        item: String,
        version: String,
        #[source]
        source: semver::Error,
    },

    /// A board declares a malformed USB identifier.
    #[error("invalid USB id '{value}' on board '{board}'")]
    InvalidUsbId { board: String, value: String },
}

/// Result type alias for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
