//! Long-lived handle pairing the protocol with one transport.

use std::path::Path;
use std::time::SystemTime;

use crate::error::DownloadError;
use crate::transport::{CurlTransport, Transport, TransportOptions};

/// Runs update checks and conditional downloads over a shared transport.
///
/// Cheap to share: wrap in an `Arc` (or share `&Mirror`) to run downloads for
/// different local paths from several threads over one connection pool.
#[derive(Debug, Default)]
pub struct Mirror<T = CurlTransport> {
    transport: T,
}

impl Mirror<CurlTransport> {
    /// Mirror over a default [`CurlTransport`] (no timeouts).
    pub fn new() -> Self {
        Self::with_transport(CurlTransport::new())
    }

    pub fn with_options(options: TransportOptions) -> Self {
        Self::with_transport(CurlTransport::with_options(options))
    }
}

impl<T: Transport> Mirror<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// See [`check_update`](crate::check::check_update).
    pub fn check_update(&self, resource_url: &str, reference: SystemTime) -> Result<bool, DownloadError> {
        crate::check::check_update(&self.transport, resource_url, reference)
    }

    /// See [`download_source`](crate::fetch::download_source).
    pub fn download_source(&self, target_dir: &Path, resource_url: &str) -> Result<bool, DownloadError> {
        crate::fetch::download_source(&self.transport, target_dir, resource_url)
    }
}
