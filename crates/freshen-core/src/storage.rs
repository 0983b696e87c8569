//! Swap-file lifecycle: create, fill, close, stamp, rename into place.
//!
//! A download is written to `<final>.swp` and only renamed onto the final path
//! once it is complete, so the final path only ever holds a whole file. A
//! failed rename leaves the swap file behind; it is truncated and reused by
//! the next download of the same resource.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use filetime::FileTime;

use crate::error::{DownloadError, JoinedError};

/// Suffix appended to the final path while a download is in flight.
pub const SWAP_SUFFIX: &str = ".swp";

/// Path for the swap file: appends `.swp` to the final path (e.g. `foo.txt` → `foo.txt.swp`).
pub fn swap_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(SWAP_SUFFIX);
    PathBuf::from(o)
}

/// Open swap file being filled with a response body.
pub struct SwapFile {
    file: File,
    path: PathBuf,
}

impl SwapFile {
    /// Create (or truncate) the swap file at `path`.
    pub fn create(path: &Path) -> Result<Self, DownloadError> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|source| DownloadError::FileCreate {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(SwapFile {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream all of `body` into the file. Returns bytes written.
    ///
    /// The raw I/O error is returned so the caller can combine it with the
    /// outcome of closing the file.
    pub fn copy_from<R: Read + ?Sized>(&mut self, body: &mut R) -> io::Result<u64> {
        io::copy(body, &mut self.file)
    }

    /// Flush and sync, then close. Deferred write errors surface here.
    pub fn close(mut self) -> Result<(), DownloadError> {
        let synced = self.file.flush().and_then(|()| self.file.sync_all());
        synced.map_err(|source| DownloadError::Close {
            path: self.path,
            source,
        })
    }
}

/// Close `swap` after its body copy failed with `source`.
///
/// Returns the copy error, or, if closing failed too, both as
/// `Joined([Close, Copy])` with the copy error as primary cause. The swap file
/// is not removed.
pub fn abort_copy(swap: SwapFile, source: io::Error) -> DownloadError {
    let copy = DownloadError::Copy {
        path: swap.path.clone(),
        source,
    };
    with_close_outcome(copy, swap.close())
}

fn with_close_outcome(copy: DownloadError, closed: Result<(), DownloadError>) -> DownloadError {
    match closed {
        Ok(()) => copy,
        Err(close) => DownloadError::Joined(JoinedError::new(vec![close, copy], 1)),
    }
}

/// Set the modification time of `path`, leaving its access time untouched.
pub fn set_modified(path: &Path, modified: SystemTime) -> Result<(), DownloadError> {
    filetime::set_file_mtime(path, FileTime::from_system_time(modified)).map_err(|source| {
        DownloadError::Chtimes {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Atomically rename the swap file onto the final path, replacing any
/// previous file. Fails if the two are on different filesystems.
pub fn finalize(swap: &Path, final_path: &Path) -> Result<(), DownloadError> {
    std::fs::rename(swap, final_path).map_err(|source| DownloadError::Rename {
        from: swap.to_path_buf(),
        to: final_path.to_path_buf(),
        source,
    })
}
