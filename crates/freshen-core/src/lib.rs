//! Conditional mirroring of remote files.
//!
//! [`download_source`] keeps `<dir>/<basename(url)>` in step with a remote
//! resource: it HEADs the resource when a local copy exists, downloads only
//! when the remote `Last-Modified` is strictly newer than the local mtime,
//! writes through a `.swp` file and renames it into place with the remote
//! timestamp applied. [`check_update`] is the HEAD-only half.

pub mod config;
pub mod logging;

pub mod check;
pub mod error;
pub mod fetch;
pub mod headers;
pub mod last_modified;
pub mod mirror;
pub mod storage;
pub mod transport;
pub mod url_model;

pub use check::check_update;
pub use error::{DownloadError, ErrorKind, JoinedError};
pub use fetch::download_source;
pub use mirror::Mirror;
pub use transport::{CurlTransport, Transport, TransportOptions};
