//! Error taxonomy for the check-then-fetch protocol.
//!
//! Every variant carries the URL or path it concerns so a caller printing the
//! error chain can tell which phase failed and against which resource. None of
//! these errors are retried internally.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::transport::{Method, TransportError};

/// Failure of [`check_update`](crate::check_update) or
/// [`download_source`](crate::download_source).
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The resource URL could not be parsed.
    #[error("couldn't parse resource URL({url})")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The resource URL parsed but its path has no usable final segment.
    #[error("resource URL({url}) has no file name in its path")]
    NoFileName { url: String },

    /// The local file exists but could not be stat'ed.
    #[error("unexpected error stat'ing file({})", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The request could not be built or the transfer failed.
    #[error("{method} request to {url} failed")]
    Request {
        method: Method,
        url: String,
        #[source]
        source: TransportError,
    },

    /// The server answered with something other than 200.
    #[error("{method} request to {url} returned bad status: {status}")]
    Status {
        method: Method,
        url: String,
        status: u32,
    },

    /// The response had no `Last-Modified` header.
    #[error("no last modified time for URL: {url}")]
    MissingTimestamp { url: String },

    /// The `Last-Modified` header was not an RFC 1123 date.
    #[error("couldn't parse last-modified time({value}) for URL({url})")]
    TimestampParse {
        url: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The pre-download update check failed.
    #[error("checking for update({url}) failed")]
    UpdateCheck {
        url: String,
        #[source]
        source: Box<DownloadError>,
    },

    /// The swap file could not be created.
    #[error("failed to create file({})", path.display())]
    FileCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Streaming the response body into the swap file failed.
    #[error("copy error writing file({})", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Several failures observed together (a copy error plus the close error
    /// of the best-effort close that followed it).
    #[error(transparent)]
    Joined(JoinedError),

    /// Closing (flushing) the swap file failed.
    #[error("failed to close file({})", path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Setting the swap file's modification time failed.
    #[error("chtimes error on file({})", path.display())]
    Chtimes {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Renaming the swap file into place failed. The swap file is left behind.
    #[error("failed to rename {} to {}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Flat classification of a [`DownloadError`], for callers that branch on the
/// failed phase without matching payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UrlParse,
    Stat,
    Request,
    Status,
    MissingTimestamp,
    TimestampParse,
    UpdateCheck,
    FileCreate,
    Copy,
    Close,
    Chtimes,
    Rename,
}

impl DownloadError {
    /// Which phase of the protocol failed.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DownloadError::UrlParse { .. } | DownloadError::NoFileName { .. } => ErrorKind::UrlParse,
            DownloadError::Stat { .. } => ErrorKind::Stat,
            DownloadError::Request { .. } => ErrorKind::Request,
            DownloadError::Status { .. } => ErrorKind::Status,
            DownloadError::MissingTimestamp { .. } => ErrorKind::MissingTimestamp,
            DownloadError::TimestampParse { .. } => ErrorKind::TimestampParse,
            DownloadError::UpdateCheck { .. } => ErrorKind::UpdateCheck,
            DownloadError::FileCreate { .. } => ErrorKind::FileCreate,
            DownloadError::Copy { .. } => ErrorKind::Copy,
            DownloadError::Joined(joined) => joined.primary().kind(),
            DownloadError::Close { .. } => ErrorKind::Close,
            DownloadError::Chtimes { .. } => ErrorKind::Chtimes,
            DownloadError::Rename { .. } => ErrorKind::Rename,
        }
    }
}

/// Ordered set of errors with one designated primary cause.
///
/// `Display` renders every cause with its own source chain, joined by `"; "`.
/// `source()` is `None`: inspect [`causes`](Self::causes) or
/// [`primary`](Self::primary) instead.
#[derive(Debug)]
pub struct JoinedError {
    causes: Vec<DownloadError>,
    primary: usize,
}

impl JoinedError {
    /// `primary` indexes into `causes`.
    pub(crate) fn new(causes: Vec<DownloadError>, primary: usize) -> Self {
        debug_assert!(primary < causes.len());
        Self { causes, primary }
    }

    /// All causes, in the order they were observed.
    pub fn causes(&self) -> &[DownloadError] {
        &self.causes
    }

    /// The cause that decided the outcome.
    pub fn primary(&self) -> &DownloadError {
        &self.causes[self.primary]
    }
}

impl fmt::Display for JoinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cause) in self.causes.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", cause)?;
            let mut source = std::error::Error::source(cause);
            while let Some(err) = source {
                write!(f, ": {}", err)?;
                source = err.source();
            }
        }
        Ok(())
    }
}

impl std::error::Error for JoinedError {}
