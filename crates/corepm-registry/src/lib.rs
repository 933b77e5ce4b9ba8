//! Discovery and acquisition for the corepm package manager.
//!
//! Handles searching the catalog for platforms, resolving platform
//! references into the releases and tools they imply, and fetching those
//! archives into the local download cache.
//!
//! # Architecture
//!
//! ```text
//! search:    query ──► search::search ──► [PlatformRelease]
//! download:  tokens ──► reference ──► resolution ──► DownloadPlan
//!                                                       │
//!                 download::download_items ◄────────────┘
//!                   │  tools first, then platforms, stop at first failure
//!                   ▼
//!                 Fetcher (http::HttpFetcher + cache::DownloadCache)
//! ```
//!
//! Everything here runs sequentially on the calling thread.

pub mod cache;
pub mod download;
pub mod error;
pub mod fetch;
pub mod http;
pub mod integrity;
pub mod reference;
pub mod resolution;
pub mod search;

// Re-exports for convenience.
pub use cache::DownloadCache;
pub use download::{download_items, DownloadSummary, DownloadedItem, ItemStatus, Reporter};
pub use error::{DownloadError, FetchError, ReferenceError, ResolveError};
pub use fetch::{Artifact, ArtifactKind, FetchOutcome, Fetcher, Transfer};
pub use http::{HttpFetcher, HttpOptions};
pub use integrity::{Checksum, ContentHash};
pub use reference::{parse_references, PlatformReference};
pub use resolution::{find_items_to_download, DownloadPlan};
pub use search::{find_releases_with_usb_id, search, usb_id_query};
