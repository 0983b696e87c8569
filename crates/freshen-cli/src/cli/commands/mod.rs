//! CLI command handlers, one file per subcommand.

mod check;
mod fetch;
mod sync;

pub use check::run_check;
pub use fetch::run_fetch;
pub use sync::run_sync;
#[cfg(test)]
pub(crate) use sync::sync_sources;
