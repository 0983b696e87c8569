//! CLI for freshen.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use freshen_core::config::{self, FreshenConfig};
use freshen_core::Mirror;
use std::path::PathBuf;

use commands::{run_check, run_fetch, run_sync};

/// Top-level CLI for freshen.
#[derive(Debug, Parser)]
#[command(name = "freshen")]
#[command(about = "freshen: download remote files only when they changed", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/freshen/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Report whether the remote copy is newer than a local file (HEAD only).
    Check {
        /// Direct HTTP/HTTPS URL of the resource.
        url: String,
        /// Local file whose modification time is the reference.
        file: PathBuf,
    },

    /// Download a resource if the remote copy is newer than the local mirror.
    Fetch {
        /// Direct HTTP/HTTPS URL of the resource.
        url: String,
        /// Directory holding the mirror (default: config target_dir, else current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Fetch every source listed in the config file, one after another.
    Sync {
        /// Directory holding the mirrors (default: config target_dir, else current directory).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        let mirror = Mirror::with_options(cfg.http.transport_options());

        match self.command {
            CliCommand::Check { url, file } => run_check(&mirror, &url, &file)?,
            CliCommand::Fetch { url, dir } => {
                let dir = target_dir(dir, &cfg)?;
                run_fetch(&mirror, &dir, &url)?;
            }
            CliCommand::Sync { dir } => {
                let dir = target_dir(dir, &cfg)?;
                run_sync(&mirror, &dir, &cfg.sources)?;
            }
        }

        Ok(())
    }
}

/// `--dir` wins over config `target_dir`, which wins over the current directory.
fn target_dir(flag: Option<PathBuf>, cfg: &FreshenConfig) -> Result<PathBuf> {
    match flag.or_else(|| cfg.target_dir.clone()) {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("failed to resolve current directory"),
    }
}

#[cfg(test)]
mod tests;
