//! `corepm download <PACKAGER:ARCH[=VERSION]...>`.

use anyhow::{Context, Result};

use corepm_index::{Catalog, HostPlatform};
use corepm_registry::{
    download_items, find_items_to_download, parse_references, DownloadCache, DownloadError,
    DownloadSummary, Fetcher, HttpFetcher, PlatformReference, Reporter,
};

use crate::config::Settings;
use crate::exit::{CommandError, ExitCode, WithExitCode};
use crate::output::{self, ConsoleReporter, Format};

/// Run `corepm download`.
pub fn run(settings: &Settings, format: Format, tokens: &[String]) -> Result<()> {
    tracing::info!("Executing `core download`");
    let references = parse_references(tokens).exit_code(ExitCode::BadArgument)?;
    let catalog = super::load_catalog(&settings.data_dir)?;

    let cache = DownloadCache::new(settings.downloads_dir.clone());
    let fetcher = HttpFetcher::new(cache, &settings.http)
        .context("Error configuring the HTTP client")
        .exit_code(ExitCode::CoreConfig)?;
    let mut reporter = ConsoleReporter::new(format);

    let summary = download(
        &catalog,
        &references,
        &HostPlatform::current(),
        &fetcher,
        &mut reporter,
    )?;

    if format == Format::Json {
        let mut stdout = std::io::stdout().lock();
        output::write_download_summary(&mut stdout, &summary)
            .context("writing download summary")?;
    }
    Ok(())
}

/// Resolve `references` and fetch everything they imply.
pub fn download(
    catalog: &Catalog,
    references: &[PlatformReference],
    host: &HostPlatform,
    fetcher: &dyn Fetcher,
    reporter: &mut dyn Reporter,
) -> Result<DownloadSummary> {
    let plan = find_items_to_download(catalog, references)
        .context("Could not determine platform dependencies")
        .exit_code(ExitCode::BadCall)?;

    download_items(&plan, host, fetcher, reporter).map_err(|err| {
        let code = match err {
            DownloadError::Incompatible { .. } => ExitCode::Generic,
            DownloadError::Request { .. } | DownloadError::Transfer { .. } => ExitCode::Network,
        };
        CommandError::new(code, err).into()
    })
}
