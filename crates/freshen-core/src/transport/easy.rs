//! libcurl-backed transport with a pool of reusable easy handles.

use std::fmt;
use std::io::{self, Seek, SeekFrom, Write};
use std::str;
use std::sync::Mutex;
use std::time::Duration;

use curl::easy::Easy;

use super::{Response, ResponseHead, Transport, TransportError};
use crate::headers::Headers;

/// `User-Agent` sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("freshen/", env!("CARGO_PKG_VERSION"));

const MAX_REDIRECTS: u32 = 10;

/// Per-request libcurl options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Connect phase limit. `None` leaves libcurl's default.
    pub connect_timeout: Option<Duration>,
    /// Whole-transfer limit. `None` means no limit.
    pub timeout: Option<Duration>,
    /// Follow 3xx responses (up to 10 hops).
    pub follow_redirects: bool,
    pub user_agent: Option<String>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            timeout: None,
            follow_redirects: true,
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
        }
    }
}

/// [`Transport`] over libcurl easy handles.
///
/// Idle handles are kept in a shared pool so keep-alive connections survive
/// between requests; the transport can be wrapped in an `Arc` and used from
/// several threads at once. Requests block the calling thread; call from
/// `spawn_blocking` if used from async code.
///
/// GET bodies are spooled into an anonymous temporary file and handed back
/// rewound, so memory use does not grow with the resource size.
pub struct CurlTransport {
    options: TransportOptions,
    idle: Mutex<Vec<Easy>>,
}

impl CurlTransport {
    /// Transport with default options (no timeouts).
    pub fn new() -> Self {
        Self::with_options(TransportOptions::default())
    }

    pub fn with_options(options: TransportOptions) -> Self {
        Self {
            options,
            idle: Mutex::new(Vec::new()),
        }
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    fn checkout(&self) -> Easy {
        self.idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop()
            .unwrap_or_else(Easy::new)
    }

    fn checkin(&self, mut easy: Easy) {
        // reset() clears options but keeps the connection cache.
        easy.reset();
        self.idle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(easy);
    }

    fn configure(&self, easy: &mut Easy, url: &str) -> Result<(), curl::Error> {
        easy.url(url)?;
        easy.follow_location(self.options.follow_redirects)?;
        if self.options.follow_redirects {
            easy.max_redirections(MAX_REDIRECTS)?;
        }
        if let Some(t) = self.options.connect_timeout {
            easy.connect_timeout(t)?;
        }
        if let Some(t) = self.options.timeout {
            easy.timeout(t)?;
        }
        if let Some(ua) = &self.options.user_agent {
            easy.useragent(ua)?;
        }
        Ok(())
    }

    fn perform_head(&self, easy: &mut Easy, url: &str) -> Result<ResponseHead, TransportError> {
        self.configure(easy, url)
            .map_err(TransportError::InvalidRequest)?;
        easy.nobody(true).map_err(TransportError::InvalidRequest)?;

        let mut lines: Vec<String> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    collect_header_line(&mut lines, data);
                    true
                })
                .map_err(TransportError::InvalidRequest)?;
            transfer.perform().map_err(TransportError::Curl)?;
        }

        let status = easy.response_code().map_err(TransportError::Curl)?;
        Ok(ResponseHead {
            status,
            headers: Headers::from_lines(&lines),
        })
    }

    fn perform_get(&self, easy: &mut Easy, url: &str) -> Result<Response, TransportError> {
        self.configure(easy, url)
            .map_err(TransportError::InvalidRequest)?;

        let mut spool = tempfile::tempfile().map_err(TransportError::Spool)?;
        let mut spool_error: Option<io::Error> = None;
        let mut lines: Vec<String> = Vec::new();
        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    collect_header_line(&mut lines, data);
                    true
                })
                .map_err(TransportError::InvalidRequest)?;
            transfer
                .write_function(|data| match spool.write_all(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        spool_error = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(TransportError::InvalidRequest)?;
            transfer.perform()
        };
        if let Some(e) = spool_error {
            return Err(TransportError::Spool(e));
        }
        performed.map_err(TransportError::Curl)?;

        let status = easy.response_code().map_err(TransportError::Curl)?;
        spool
            .seek(SeekFrom::Start(0))
            .map_err(TransportError::Spool)?;
        Ok(Response {
            head: ResponseHead {
                status,
                headers: Headers::from_lines(&lines),
            },
            body: Box::new(spool),
        })
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CurlTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurlTransport")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Transport for CurlTransport {
    fn head(&self, url: &str) -> Result<ResponseHead, TransportError> {
        let mut easy = self.checkout();
        let result = self.perform_head(&mut easy, url);
        self.checkin(easy);
        result
    }

    fn get(&self, url: &str) -> Result<Response, TransportError> {
        let mut easy = self.checkout();
        let result = self.perform_get(&mut easy, url);
        self.checkin(easy);
        result
    }
}

/// Record one raw header line. A status line starts a new response (a
/// redirect hop), so anything collected before it is dropped.
fn collect_header_line(lines: &mut Vec<String>, data: &[u8]) {
    if let Ok(s) = str::from_utf8(data) {
        let line = s.trim_end();
        if line.starts_with("HTTP/") {
            lines.clear();
        }
        lines.push(line.to_string());
    }
}
