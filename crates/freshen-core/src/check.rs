//! Update check: is the remote copy strictly newer than a reference time?

use std::time::SystemTime;

use crate::error::DownloadError;
use crate::last_modified::{as_utc, last_modified};
use crate::transport::{Method, Transport};

/// Status every response must carry.
const STATUS_OK: u32 = 200;

/// HEAD `resource_url` and report whether its `Last-Modified` is strictly
/// later than `reference`. Equal timestamps mean no update.
///
/// Only the HEAD request is performed; no local state is read or written.
pub fn check_update<T: Transport + ?Sized>(
    transport: &T,
    resource_url: &str,
    reference: SystemTime,
) -> Result<bool, DownloadError> {
    tracing::debug!(url = resource_url, "checking for update");

    let head = transport
        .head(resource_url)
        .map_err(|source| DownloadError::Request {
            method: Method::Head,
            url: resource_url.to_string(),
            source,
        })?;
    require_ok(Method::Head, resource_url, head.status)?;
    let remote = last_modified(&head.headers, resource_url)?;

    if !is_newer(remote, reference) {
        tracing::debug!(
            url = resource_url,
            remote_time = %as_utc(remote),
            local_time = %as_utc(reference),
            "no update needed"
        );
        return Ok(false);
    }
    tracing::debug!(
        url = resource_url,
        remote_time = %as_utc(remote),
        local_time = %as_utc(reference),
        "found update"
    );
    Ok(true)
}

/// Strict comparison: `remote > reference`.
pub fn is_newer(remote: SystemTime, reference: SystemTime) -> bool {
    remote > reference
}

pub(crate) fn require_ok(method: Method, url: &str, status: u32) -> Result<(), DownloadError> {
    if status != STATUS_OK {
        return Err(DownloadError::Status {
            method,
            url: url.to_string(),
            status,
        });
    }
    Ok(())
}
