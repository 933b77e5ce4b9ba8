//! Console output: search tables, JSON documents and download progress.

use std::io::{self, IsTerminal, Write};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;

use corepm_index::PlatformRelease;
use corepm_registry::{DownloadSummary, Reporter};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Human-readable text.
    #[default]
    Text,
    /// Machine-readable JSON on stdout.
    Json,
}

/// One search hit as printed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRow {
    pub id: String,
    pub version: String,
    pub name: String,
    pub boards: Vec<String>,
}

impl From<&PlatformRelease> for SearchRow {
    fn from(release: &PlatformRelease) -> Self {
        SearchRow {
            id: release.platform_id(),
            version: release.version.to_string(),
            name: release.name.clone(),
            boards: release.boards.iter().map(|b| b.name.clone()).collect(),
        }
    }
}

/// Print the result of a search.
///
/// The JSON form is the bare array of hits, without the banner.
pub fn write_search(
    out: &mut dyn Write,
    format: Format,
    query: &str,
    results: &[&PlatformRelease],
) -> io::Result<()> {
    let rows: Vec<SearchRow> = results.iter().map(|&r| SearchRow::from(r)).collect();

    if format == Format::Json {
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        return writeln!(out);
    }

    writeln!(out, "Searching for platforms matching '{query}'")?;
    writeln!(out)?;
    if rows.is_empty() {
        return writeln!(out, "No platforms matching your search");
    }

    let id_width = column_width("ID", rows.iter().map(|r| r.id.as_str()));
    let version_width = column_width("Version", rows.iter().map(|r| r.version.as_str()));
    writeln!(out, "{:<id_width$}  {:<version_width$}  Name", "ID", "Version")?;
    for row in &rows {
        writeln!(
            out,
            "{:<id_width$}  {:<version_width$}  {}",
            row.id, row.version, row.name
        )?;
    }
    Ok(())
}

fn column_width<'a>(header: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(|c| c.chars().count()).fold(header.len(), usize::max)
}

/// Print the JSON summary of a finished download batch.
pub fn write_download_summary(out: &mut dyn Write, summary: &DownloadSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out)
}

/// Reports download progress on the terminal.
///
/// Lines go to stdout in text mode and to the log in JSON mode, where
/// stdout is kept for the summary. Progress bars are drawn only when stdout
/// is a terminal.
pub struct ConsoleReporter {
    format: Format,
    show_bars: bool,
    current: Option<(String, ProgressBar)>,
}

impl ConsoleReporter {
    pub fn new(format: Format) -> Self {
        ConsoleReporter {
            format,
            show_bars: format == Format::Text && io::stdout().is_terminal(),
            current: None,
        }
    }

    fn bar(&self, label: &str, total: Option<u64>) -> ProgressBar {
        if !self.show_bars {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::with_draw_target(total, ProgressDrawTarget::stdout());
        let style = match total {
            Some(_) => ProgressStyle::with_template(
                "{msg} [{bar:40}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
            )
            .map(|s| s.progress_chars("=> "))
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
            None => ProgressStyle::with_template("{spinner} {msg} {bytes} ({bytes_per_sec})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        };
        bar.set_style(style);
        bar.set_message(label.to_string());
        bar
    }
}

impl Reporter for ConsoleReporter {
    fn print(&mut self, line: &str) {
        match self.format {
            Format::Text => println!("{line}"),
            Format::Json => tracing::info!("{line}"),
        }
    }

    fn transfer_started(&mut self, label: &str, total: Option<u64>) {
        tracing::debug!(label, total, "transfer started");
        let bar = self.bar(label, total);
        self.current = Some((label.to_string(), bar));
    }

    fn transfer_progress(&mut self, downloaded: u64) {
        if let Some((_, bar)) = &self.current {
            bar.set_position(downloaded);
        }
    }

    fn transfer_finished(&mut self, ok: bool) {
        let Some((label, bar)) = self.current.take() else {
            return;
        };
        if ok {
            bar.finish();
            if !self.show_bars {
                self.print(&format!("{label} downloaded"));
            }
        } else {
            bar.abandon();
        }
    }
}
