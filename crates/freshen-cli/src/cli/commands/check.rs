//! `freshen check <url> <file>` – HEAD-only staleness check.

use anyhow::{Context, Result};
use freshen_core::{Mirror, Transport};
use std::path::Path;

pub fn run_check<T: Transport>(mirror: &Mirror<T>, url: &str, file: &Path) -> Result<()> {
    let reference = std::fs::metadata(file)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("failed to read modification time of {}", file.display()))?;
    if mirror.check_update(url, reference)? {
        println!("update available: {url}");
    } else {
        println!("up to date: {}", file.display());
    }
    Ok(())
}
