//! Package index model for the corepm toolchain package manager.
//!
//! The catalog is an in-memory view of every known package, the platforms
//! (hardware cores) each package ships, their versioned releases with board
//! manifests, and the tools those releases depend on.
//!
//! # Architecture
//!
//! ```text
//! Catalog
//!   └── Package
//!         ├── Platform (by architecture)
//!         │     └── PlatformRelease (boards, tool dependencies, archive)
//!         └── Tool (by name)
//!               └── ToolRelease
//!                     └── Flavour (one archive per host triple)
//! ```
//!
//! The catalog is built once per command from the JSON package index files
//! found in the data directory and is read-only afterwards.

pub mod board;
pub mod catalog;
pub mod error;
pub mod host;
pub mod index_file;
pub mod platform;
pub mod resource;
pub mod tool;
pub mod version;

// Re-exports for convenience.
pub use board::{Board, UsbId};
pub use catalog::Catalog;
pub use error::{IndexError, Result};
pub use host::HostPlatform;
pub use platform::{Package, Platform, PlatformRelease};
pub use resource::Resource;
pub use tool::{Flavour, Tool, ToolDependency, ToolRelease};
pub use version::Version;
