//! `freshen sync` – fetch every configured source in turn.
//!
//! A failing source is reported and skipped; it is not retried.

use anyhow::{bail, Result};
use freshen_core::{DownloadError, Mirror, Transport};
use std::path::Path;

/// Outcome of one pass over the configured sources.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub downloaded: Vec<String>,
    pub up_to_date: Vec<String>,
    pub failed: Vec<(String, DownloadError)>,
}

/// Run the fetcher for each source sequentially, collecting every outcome.
pub fn sync_sources<T: Transport>(mirror: &Mirror<T>, dir: &Path, sources: &[String]) -> SyncReport {
    let mut report = SyncReport::default();
    for url in sources {
        match mirror.download_source(dir, url) {
            Ok(true) => report.downloaded.push(url.clone()),
            Ok(false) => report.up_to_date.push(url.clone()),
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "sync failed for source");
                report.failed.push((url.clone(), err));
            }
        }
    }
    report
}

pub fn run_sync<T: Transport>(mirror: &Mirror<T>, dir: &Path, sources: &[String]) -> Result<()> {
    if sources.is_empty() {
        println!("No sources configured.");
        return Ok(());
    }
    let report = sync_sources(mirror, dir, sources);
    for url in &report.downloaded {
        println!("{:<12} {}", "downloaded", url);
    }
    for url in &report.up_to_date {
        println!("{:<12} {}", "up-to-date", url);
    }
    let failed = report.failed.len();
    for (url, err) in report.failed {
        println!("{:<12} {}", "failed", url);
        eprintln!("  {:#}", anyhow::Error::from(err));
    }
    if failed > 0 {
        bail!("{} of {} sources failed", failed, sources.len());
    }
    Ok(())
}
