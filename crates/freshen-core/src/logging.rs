//! Logging init for the `freshen` binary.
//!
//! The fetch operations only emit `tracing` events; without a subscriber they
//! are no-ops. These helpers install one that writes to the XDG state log
//! file, or to stderr when that file cannot be opened.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,freshen_core=debug,freshen=debug";

/// Log file location: `~/.local/state/freshen/freshen.log`.
pub fn log_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("freshen")?;
    Ok(xdg_dirs.get_state_home().join("freshen.log"))
}

/// Append events to the log file. Errors (unwritable state dir, subscriber
/// already set) are returned so the caller can fall back to stderr.
pub fn init_logging() -> Result<()> {
    let path = log_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    install(Mutex::new(file))?;
    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}

/// Log to stderr only. Never fails; a subscriber set earlier is kept.
pub fn init_logging_stderr() {
    let _ = install(std::io::stderr);
}

fn install<W>(writer: W) -> Result<()>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}
