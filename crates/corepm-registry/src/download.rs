//! The download batch.
//!
//! Tools are fetched before platforms and each list in plan order. Every
//! tool must have a build for the running host before anything is fetched.
//! The first item that cannot be fetched ends the batch; archives fetched
//! before it stay in the cache, so a re-run picks up where this one stopped.

use std::path::PathBuf;

use serde::Serialize;

use corepm_index::{Flavour, HostPlatform, ToolRelease};

use crate::error::DownloadError;
use crate::fetch::{fetch_platform_release, fetch_tool_release, ArtifactKind, FetchOutcome, Fetcher};
use crate::resolution::DownloadPlan;

/// Receives the user-facing progress of a download batch.
pub trait Reporter {
    /// Print an informational line.
    fn print(&mut self, line: &str);

    /// A transfer for `label` has started; `total` is its size if known.
    fn transfer_started(&mut self, label: &str, total: Option<u64>);

    /// Cumulative bytes received by the current transfer.
    fn transfer_progress(&mut self, downloaded: u64);

    /// The current transfer has ended.
    fn transfer_finished(&mut self, ok: bool);
}

/// How an item ended up in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ItemStatus {
    /// It was already there.
    AlreadyPresent,
    /// It was fetched during this batch.
    Downloaded { path: PathBuf },
}

/// One item of a finished batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadedItem {
    pub label: String,
    pub kind: ArtifactKind,
    #[serde(flatten)]
    pub status: ItemStatus,
}

/// Outcome of a batch in which every item succeeded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DownloadSummary {
    /// Tools first, then platforms.
    pub items: Vec<DownloadedItem>,
}

impl DownloadSummary {
    /// Number of items fetched during this batch.
    pub fn downloaded(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.status, ItemStatus::Downloaded { .. }))
            .count()
    }
}

/// Fetch every item of `plan` for `host`.
pub fn download_items(
    plan: &DownloadPlan<'_>,
    host: &HostPlatform,
    fetcher: &dyn Fetcher,
    reporter: &mut dyn Reporter,
) -> Result<DownloadSummary, DownloadError> {
    let tools = compatible_flavours(&plan.tools, host)?;
    let mut summary = DownloadSummary::default();

    reporter.print("Downloading tools...");
    for (release, flavour) in tools {
        let label = release.to_string();
        let outcome = fetch_tool_release(fetcher, release, flavour);
        let status = settle(outcome, &label, reporter)?;
        summary.items.push(DownloadedItem {
            label,
            kind: ArtifactKind::Tool,
            status,
        });
    }

    reporter.print("Downloading cores...");
    for release in &plan.platforms {
        let label = release.to_string();
        let outcome = fetch_platform_release(fetcher, release);
        let status = settle(outcome, &label, reporter)?;
        summary.items.push(DownloadedItem {
            label,
            kind: ArtifactKind::Platform,
            status,
        });
    }

    tracing::info!("Done");
    Ok(summary)
}

/// Pair every tool with its build for `host`, or name the first without one.
fn compatible_flavours<'a>(
    tools: &[&'a ToolRelease],
    host: &HostPlatform,
) -> Result<Vec<(&'a ToolRelease, &'a Flavour)>, DownloadError> {
    tools
        .iter()
        .map(|&tool| {
            tool.compatible_flavour(host)
                .map(|flavour| (tool, flavour))
                .ok_or_else(|| DownloadError::Incompatible {
                    tool: tool.to_string(),
                })
        })
        .collect()
}

/// Drive one fetch outcome to its end.
fn settle(
    outcome: FetchOutcome,
    label: &str,
    reporter: &mut dyn Reporter,
) -> Result<ItemStatus, DownloadError> {
    match outcome {
        FetchOutcome::Failed(source) => Err(DownloadError::Request {
            label: label.to_string(),
            source,
        }),
        FetchOutcome::AlreadyPresent => {
            reporter.print(&format!("{label} already downloaded"));
            Ok(ItemStatus::AlreadyPresent)
        }
        FetchOutcome::InProgress(transfer) => {
            reporter.transfer_started(label, transfer.total_size());
            let result = transfer.complete(&mut |n| reporter.transfer_progress(n));
            reporter.transfer_finished(result.is_ok());
            match result {
                Ok(path) => {
                    tracing::debug!(path = %path.display(), "{label} downloaded");
                    Ok(ItemStatus::Downloaded { path })
                }
                Err(source) => Err(DownloadError::Transfer {
                    label: label.to_string(),
                    source,
                }),
            }
        }
    }
}
