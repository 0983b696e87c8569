//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves one body under any path with a configurable `Last-Modified` and
//! status, answers `/redirect/<name>` with a 302 to `/<name>`, and counts HEAD
//! and GET requests. Every response closes the connection.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

struct State {
    body: Mutex<Vec<u8>>,
    last_modified: Mutex<Option<String>>,
    head_status: AtomicU32,
    get_status: AtomicU32,
    last_modified_on_get: AtomicBool,
    heads: AtomicUsize,
    gets: AtomicUsize,
}

/// Handle to a running server. The server runs until the process exits.
pub struct MirrorServer {
    base: String,
    state: Arc<State>,
}

impl MirrorServer {
    /// Start serving `body` with `Last-Modified: <last_modified>`.
    pub fn start(body: &[u8], last_modified: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(State {
            body: Mutex::new(body.to_vec()),
            last_modified: Mutex::new(Some(last_modified.to_string())),
            head_status: AtomicU32::new(200),
            get_status: AtomicU32::new(200),
            last_modified_on_get: AtomicBool::new(true),
            heads: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
        });
        let server_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&server_state);
                thread::spawn(move || handle(stream, &state));
            }
        });
        MirrorServer {
            base: format!("http://127.0.0.1:{}/", port),
            state,
        }
    }

    /// URL of `path` (relative, e.g. `"data/foo.txt"`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn set_body(&self, body: &[u8]) {
        *self.state.body.lock().unwrap() = body.to_vec();
    }

    pub fn set_last_modified(&self, value: Option<&str>) {
        *self.state.last_modified.lock().unwrap() = value.map(str::to_string);
    }

    pub fn set_head_status(&self, status: u32) {
        self.state.head_status.store(status, Ordering::SeqCst);
    }

    pub fn set_get_status(&self, status: u32) {
        self.state.get_status.store(status, Ordering::SeqCst);
    }

    /// When false, GET responses omit `Last-Modified` (HEAD still sends it).
    pub fn set_last_modified_on_get(&self, enabled: bool) {
        self.state.last_modified_on_get.store(enabled, Ordering::SeqCst);
    }

    pub fn head_count(&self) -> usize {
        self.state.heads.load(Ordering::SeqCst)
    }

    pub fn get_count(&self) -> usize {
        self.state.gets.load(Ordering::SeqCst)
    }
}

/// An address nothing listens on.
pub fn refused_url(path: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/{}", port, path)
}

fn handle(mut stream: TcpStream, state: &State) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    let mut parts = request.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");

    if let Some(target) = path.strip_prefix("/redirect/") {
        let response = format!(
            "HTTP/1.1 302 Found\r\nLocation: /{}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            target
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let is_head = method.eq_ignore_ascii_case("HEAD");
    let is_get = method.eq_ignore_ascii_case("GET");
    if !is_head && !is_get {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nConnection: close\r\n\r\n");
        return;
    }

    let (status, send_last_modified) = if is_head {
        state.heads.fetch_add(1, Ordering::SeqCst);
        (state.head_status.load(Ordering::SeqCst), true)
    } else {
        state.gets.fetch_add(1, Ordering::SeqCst);
        (
            state.get_status.load(Ordering::SeqCst),
            state.last_modified_on_get.load(Ordering::SeqCst),
        )
    };
    let body = if status == 200 {
        state.body.lock().unwrap().clone()
    } else {
        b"error".to_vec()
    };
    let last_modified = match state.last_modified.lock().unwrap().as_deref() {
        Some(v) if send_last_modified && status == 200 => format!("Last-Modified: {}\r\n", v),
        _ => String::new(),
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        reason(status),
        body.len(),
        last_modified
    );
    let _ = stream.write_all(response.as_bytes());
    if is_get {
        let _ = stream.write_all(&body);
    }
}

/// Reads up to the end of the request head.
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    }
    String::from_utf8(buf).ok()
}

fn reason(status: u32) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
