//! Scripted in-memory transport for unit tests.

use std::io::{self, Read};
use std::sync::Mutex;

use super::{Method, Response, ResponseHead, Transport, TransportError};
use crate::headers::{Headers, LAST_MODIFIED};

/// Serves one resource and records every request it receives.
pub(crate) struct FakeTransport {
    head_status: u32,
    get_status: u32,
    head_last_modified: Option<String>,
    get_last_modified: Option<String>,
    body: Vec<u8>,
    body_error_after: Option<usize>,
    unreachable: bool,
    requests: Mutex<Vec<(Method, String)>>,
}

impl FakeTransport {
    /// 200 for HEAD and GET, both carrying `last_modified`.
    pub(crate) fn serving(last_modified: &str, body: &[u8]) -> Self {
        Self {
            head_status: 200,
            get_status: 200,
            head_last_modified: Some(last_modified.to_string()),
            get_last_modified: Some(last_modified.to_string()),
            body: body.to_vec(),
            body_error_after: None,
            unreachable: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_head_status(mut self, status: u32) -> Self {
        self.head_status = status;
        self
    }

    pub(crate) fn with_get_status(mut self, status: u32) -> Self {
        self.get_status = status;
        self
    }

    pub(crate) fn with_head_last_modified(mut self, value: Option<&str>) -> Self {
        self.head_last_modified = value.map(str::to_string);
        self
    }

    pub(crate) fn with_get_last_modified(mut self, value: Option<&str>) -> Self {
        self.get_last_modified = value.map(str::to_string);
        self
    }

    /// The GET body yields `n` bytes and then fails.
    pub(crate) fn failing_body_after(mut self, n: usize) -> Self {
        self.body_error_after = Some(n);
        self
    }

    /// Every request fails at the transport level.
    pub(crate) fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    pub(crate) fn count(&self, method: Method) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| *m == method)
            .count()
    }

    pub(crate) fn requests(&self) -> Vec<(Method, String)> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, method: Method, url: &str) -> Result<(), TransportError> {
        self.requests.lock().unwrap().push((method, url.to_string()));
        if self.unreachable {
            // CURLE_COULDNT_CONNECT
            return Err(TransportError::Curl(curl::Error::new(7)));
        }
        Ok(())
    }
}

fn head_with(status: u32, last_modified: &Option<String>) -> ResponseHead {
    let mut headers = Headers::new();
    if let Some(v) = last_modified {
        headers.insert(LAST_MODIFIED, v.clone());
    }
    ResponseHead { status, headers }
}

impl Transport for FakeTransport {
    fn head(&self, url: &str) -> Result<ResponseHead, TransportError> {
        self.record(Method::Head, url)?;
        Ok(head_with(self.head_status, &self.head_last_modified))
    }

    fn get(&self, url: &str) -> Result<Response, TransportError> {
        self.record(Method::Get, url)?;
        let body: Box<dyn Read + Send> = match self.body_error_after {
            Some(n) => Box::new(FailingReader {
                data: self.body[..n.min(self.body.len())].to_vec(),
                pos: 0,
            }),
            None => Box::new(io::Cursor::new(self.body.clone())),
        };
        Ok(Response {
            head: head_with(self.get_status, &self.get_last_modified),
            body,
        })
    }
}

/// Yields its data, then reports a reset connection.
struct FailingReader {
    data: Vec<u8>,
    pos: usize,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ));
        }
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
