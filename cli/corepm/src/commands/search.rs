//! `corepm search <keywords...>`.

use std::io::Write;

use anyhow::{Context, Result};

use crate::config::Settings;
use crate::output::{self, Format};

/// Run `corepm search`. The keywords are joined with single spaces.
pub fn run(settings: &Settings, format: Format, keywords: &[String]) -> Result<()> {
    tracing::info!("Executing `core search`");
    let catalog = super::load_catalog(&settings.data_dir)?;

    let query = keywords.join(" ").to_lowercase();
    let results = corepm_registry::search(&catalog, &query);
    tracing::debug!(query = %query, matches = results.len(), "search finished");

    let mut stdout = std::io::stdout().lock();
    output::write_search(&mut stdout, format, &query, &results)
        .and_then(|()| stdout.flush())
        .context("writing search results")
}
