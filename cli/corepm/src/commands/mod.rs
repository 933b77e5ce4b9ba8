//! CLI command implementations.

pub mod download;
pub mod search;

use std::path::Path;

use anyhow::{Context, Result};

use corepm_index::Catalog;

use crate::exit::{ExitCode, WithExitCode};

/// Load the package indexes from the data directory.
pub fn load_catalog(data_dir: &Path) -> Result<Catalog> {
    let catalog = Catalog::load_from_dir(data_dir)
        .context("Error loading package indexes")
        .exit_code(ExitCode::CoreConfig)?;
    tracing::info!(
        data_dir = %data_dir.display(),
        packages = catalog.packages().len(),
        "package indexes loaded"
    );
    Ok(catalog)
}
