//! `Last-Modified` extraction and RFC 1123 date parsing.

use std::time::SystemTime;

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::DownloadError;
use crate::headers::{Headers, LAST_MODIFIED};

/// Leading weekday of an RFC 1123 date, e.g. `Tue,`.
const WEEKDAY_FORMAT: &str = "%a,";

/// RFC 1123 layout after the weekday, e.g. `15 Nov 1994 12:45:26 GMT`.
pub const HTTP_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S GMT";

/// Parse an RFC 1123 HTTP date. `UTC` is accepted in place of `GMT`; every
/// other layout (RFC 850, asctime, numeric offsets) is rejected.
///
/// The weekday must be a valid abbreviation but is not checked against the
/// date: `Wed, 15 Nov 1994 12:45:26 GMT` is 1994-11-15.
pub fn parse_http_date(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let value = value.trim();
    let (weekday, stamp) = value.split_once(' ').unwrap_or((value, ""));
    format::parse(&mut Parsed::new(), weekday, StrftimeItems::new(WEEKDAY_FORMAT))?;
    let naive = match stamp.strip_suffix(" UTC") {
        Some(stamp) => NaiveDateTime::parse_from_str(&format!("{stamp} GMT"), HTTP_DATE_FORMAT)?,
        None => NaiveDateTime::parse_from_str(stamp, HTTP_DATE_FORMAT)?,
    };
    Ok(Utc.from_utc_datetime(&naive))
}

/// Modification time advertised by a response.
///
/// A missing or empty header is [`DownloadError::MissingTimestamp`]; a
/// malformed one is [`DownloadError::TimestampParse`]. Both are permanent.
pub fn last_modified(headers: &Headers, resource_url: &str) -> Result<SystemTime, DownloadError> {
    let value = headers
        .get(LAST_MODIFIED)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DownloadError::MissingTimestamp {
            url: resource_url.to_string(),
        })?;
    let parsed = parse_http_date(value).map_err(|source| DownloadError::TimestampParse {
        url: resource_url.to_string(),
        value: value.to_string(),
        source,
    })?;
    Ok(SystemTime::from(parsed))
}

/// Render a `SystemTime` for log fields.
pub(crate) fn as_utc(t: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(t)
}
