//! Local file naming for a resource URL.
//!
//! The mirror of `https://host/a/b/file.tsv?x=1` in directory `dir` is
//! `dir/file.tsv`: one local path per (directory, URL) pair.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::DownloadError;

/// Final path segment of `resource_url`, percent-decoded.
///
/// Trailing slashes are ignored (`/a/b/` yields `b`). Decoded bytes are kept
/// as they are, so on unix a non-UTF-8 name reaches the filesystem unchanged.
/// An encoded `/` (`%2F`) makes the segment unusable. Fails with
/// [`DownloadError::UrlParse`] when the URL does not parse and with
/// [`DownloadError::NoFileName`] when no segment can safely name a file.
pub fn file_name_from_url(resource_url: &str) -> Result<OsString, DownloadError> {
    let parsed = url::Url::parse(resource_url).map_err(|source| DownloadError::UrlParse {
        url: resource_url.to_string(),
        source,
    })?;
    let no_name = || DownloadError::NoFileName {
        url: resource_url.to_string(),
    };

    let segment = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
        .ok_or_else(no_name)?;
    let name = percent_decode(segment);
    let unusable = name.is_empty()
        || name == b"."
        || name == b".."
        || name.iter().any(|b| matches!(b, b'/' | 0));
    if unusable {
        return Err(no_name());
    }
    Ok(bytes_to_os_string(name))
}

/// Where the mirror of `resource_url` lives inside `target_dir`.
pub fn local_path(target_dir: &Path, resource_url: &str) -> Result<PathBuf, DownloadError> {
    Ok(target_dir.join(file_name_from_url(resource_url)?))
}

fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let high = bytes.get(i + 1).copied().and_then(hex_digit);
            let low = bytes.get(i + 2).copied().and_then(hex_digit);
            if let (Some(high), Some(low)) = (high, low) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

#[cfg(unix)]
fn bytes_to_os_string(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
fn bytes_to_os_string(bytes: Vec<u8>) -> OsString {
    OsString::from(String::from_utf8_lossy(&bytes).into_owned())
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
