//! Registry error types.

use std::path::PathBuf;

/// Errors from parsing `PACKAGER:ARCH[=VERSION]` references.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    /// The token does not have the `PACKAGER:ARCH[=VERSION]` shape.
    #[error("invalid item {token}")]
    Invalid { token: String },

    /// The version part cannot be parsed.
    #[error("invalid version '{version}' in item {token}")]
    InvalidVersion {
        token: String,
        version: String,
        #[source]
        source: semver::Error,
    },
}

/// Errors from resolving references against the catalog.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No package with this name.
    #[error("package {package} not found")]
    PackageNotFound { package: String },

    /// The package has no platform for this architecture.
    #[error("platform {package}:{architecture} not found")]
    PlatformNotFound {
        package: String,
        architecture: String,
    },

    /// The platform exists but has never been released.
    #[error("platform {package}:{architecture} has no releases")]
    NoReleases {
        package: String,
        architecture: String,
    },

    /// The requested version is not in the platform's history.
    #[error("required version {version} not found for platform {package}:{architecture}")]
    ReleaseNotFound {
        package: String,
        architecture: String,
        version: String,
    },

    /// A release depends on a tool the catalog does not know.
    #[error("tool {tool} required by {release} not found")]
    ToolNotFound { tool: String, release: String },
}

/// Errors raised by the fetch primitive.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP client could not be configured.
    #[error("configuring HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    /// The declared download location is not a usable URL.
    #[error("invalid download url '{url}': {detail}")]
    InvalidUrl { url: String, detail: String },

    /// The declared archive name is empty or escapes the cache directory.
    #[error("invalid archive file name '{name}'")]
    InvalidArchiveName { name: String },

    /// The request could not be sent or the connection failed.
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The body stream broke off before completion.
    #[error("transfer of {url} interrupted: {source}")]
    Interrupted {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The received byte count differs from the declared size.
    #[error("size mismatch for {}: expected {expected} bytes, got {actual}", path.display())]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// Reading or writing the download cache failed.
    #[error("download cache error at {}: {source}", path.display())]
    Cache {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal outcomes of a download batch.
///
/// The batch stops at the first of these; items fetched before it stay in
/// the cache.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A tool has no build for the running OS/architecture.
    #[error("The tool {tool} is not available for the current OS")]
    Incompatible { tool: String },

    /// The fetch could not be started.
    #[error("Error downloading {label}")]
    Request {
        label: String,
        #[source]
        source: FetchError,
    },

    /// The transfer started but did not complete.
    #[error("Error downloading {label}")]
    Transfer {
        label: String,
        #[source]
        source: FetchError,
    },
}
