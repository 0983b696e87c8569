//! HTTP transport seam.
//!
//! The checker and fetcher talk to the network only through [`Transport`], so a
//! long-lived client (and its connection pool) can be shared between callers
//! and replaced by a fake in tests. [`CurlTransport`] is the libcurl-backed
//! implementation.

mod easy;
#[cfg(test)]
pub(crate) mod fake;

pub use easy::{CurlTransport, TransportOptions, DEFAULT_USER_AGENT};

use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

use crate::headers::Headers;

/// Request method, as shown in error messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Head,
    Get,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Head => f.write_str("HEAD"),
            Method::Get => f.write_str("GET"),
        }
    }
}

/// Status line and headers of the final response (after redirects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u32,
    pub headers: Headers,
}

/// A full response. The body is read once, front to back.
pub struct Response {
    pub head: ResponseHead,
    pub body: Box<dyn Read + Send>,
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("head", &self.head)
            .finish_non_exhaustive()
    }
}

/// The request never produced a response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be prepared (bad URL string, rejected option).
    #[error("could not prepare request")]
    InvalidRequest(#[source] curl::Error),
    /// Connecting, sending or receiving failed.
    #[error("transfer failed")]
    Curl(#[source] curl::Error),
    /// The body could not be buffered locally.
    #[error("could not spool response body")]
    Spool(#[source] io::Error),
}

/// Issues HEAD and GET requests.
///
/// Implementations return `Ok` for every HTTP status; deciding which statuses
/// are acceptable is left to the caller.
pub trait Transport: Send + Sync {
    /// Metadata-only request: status and headers, no body.
    fn head(&self, url: &str) -> Result<ResponseHead, TransportError>;

    /// Full request including the body.
    fn get(&self, url: &str) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn head(&self, url: &str) -> Result<ResponseHead, TransportError> {
        (**self).head(url)
    }

    fn get(&self, url: &str) -> Result<Response, TransportError> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn head(&self, url: &str) -> Result<ResponseHead, TransportError> {
        (**self).head(url)
    }

    fn get(&self, url: &str) -> Result<Response, TransportError> {
        (**self).get(url)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn head(&self, url: &str) -> Result<ResponseHead, TransportError> {
        (**self).head(url)
    }

    fn get(&self, url: &str) -> Result<Response, TransportError> {
        (**self).get(url)
    }
}
