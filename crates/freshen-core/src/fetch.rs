//! Conditional download of one resource into a directory.
//!
//! Stat the local mirror, HEAD the remote if a mirror exists, and only when the
//! remote is newer (or nothing is mirrored yet) GET it into a swap file, stamp
//! the swap file with the remote `Last-Modified` and rename it into place.

use std::fs;
use std::io;
use std::path::Path;

use crate::check::{check_update, require_ok};
use crate::error::DownloadError;
use crate::last_modified::{as_utc, last_modified};
use crate::storage::{self, SwapFile};
use crate::transport::{Method, Transport};
use crate::url_model;

/// Mirror `resource_url` into `target_dir`.
///
/// Returns `Ok(true)` when a new copy was downloaded and `Ok(false)` when the
/// local copy is already current (in which case no GET is issued and nothing
/// is written). The file at `<target_dir>/<basename>` is only ever replaced by
/// a complete download, and its modification time is set to the remote
/// `Last-Modified` value.
///
/// Concurrent calls for the same local path race on the swap file; callers
/// must serialize those. If the final rename fails the `.swp` file is left in
/// place.
pub fn download_source<T: Transport + ?Sized>(
    transport: &T,
    target_dir: &Path,
    resource_url: &str,
) -> Result<bool, DownloadError> {
    let file_path = url_model::local_path(target_dir, resource_url)?;

    match fs::metadata(&file_path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(DownloadError::Stat {
                path: file_path,
                source,
            })
        }
        Ok(meta) => {
            let local_time = meta.modified().map_err(|source| DownloadError::Stat {
                path: file_path.clone(),
                source,
            })?;
            let wanted = check_update(transport, resource_url, local_time).map_err(|e| {
                DownloadError::UpdateCheck {
                    url: resource_url.to_string(),
                    source: Box::new(e),
                }
            })?;
            if !wanted {
                return Ok(false);
            }
        }
    }

    tracing::debug!(url = resource_url, path = %file_path.display(), "downloading");
    let mut response = transport
        .get(resource_url)
        .map_err(|source| DownloadError::Request {
            method: Method::Get,
            url: resource_url.to_string(),
            source,
        })?;
    require_ok(Method::Get, resource_url, response.head.status)?;
    // Separate request, so the timestamp is validated again.
    let remote_time = last_modified(&response.head.headers, resource_url)?;

    let swap_path = storage::swap_path(&file_path);
    let mut swap = SwapFile::create(&swap_path)?;
    let bytes = match swap.copy_from(&mut response.body) {
        Ok(n) => n,
        Err(source) => return Err(storage::abort_copy(swap, source)),
    };
    swap.close()?;

    storage::set_modified(&swap_path, remote_time)?;
    storage::finalize(&swap_path, &file_path)?;

    tracing::debug!(
        url = resource_url,
        path = %file_path.display(),
        bytes,
        remote_time = %as_utc(remote_time),
        "downloaded"
    );
    Ok(true)
}
