//! `freshen fetch <url>` – conditional download of one resource.

use anyhow::Result;
use freshen_core::{url_model, Mirror, Transport};
use std::path::Path;

pub fn run_fetch<T: Transport>(mirror: &Mirror<T>, dir: &Path, url: &str) -> Result<()> {
    let downloaded = mirror.download_source(dir, url)?;
    let path = url_model::local_path(dir, url)?;
    if downloaded {
        println!("downloaded {}", path.display());
    } else {
        println!("up to date {}", path.display());
    }
    Ok(())
}
