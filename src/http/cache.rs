//! HTTP cache validation module
//!
//! `Last-Modified` generation and `If-Modified-Since` evaluation.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Format a timestamp as an RFC 7231 IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Parse an HTTP date header value
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Check if client's `If-Modified-Since` header covers the file's modification time
///
/// Comparison is at second precision, since HTTP dates carry no fractions.
/// An unparseable header is ignored.
///
/// # Returns
/// Returns true if not modified (should return 304), false otherwise
pub fn is_not_modified(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn rfc_example() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(784_111_777)
    }

    #[test]
    fn test_format_http_date() {
        assert_eq!(format_http_date(rfc_example()), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_parse_http_date() {
        let parsed = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(parsed.timestamp(), 784_111_777);
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn test_is_not_modified() {
        let header = format_http_date(rfc_example());
        assert!(is_not_modified(Some(&header), rfc_example()));
        // Sub-second remainder on disk is ignored
        assert!(is_not_modified(
            Some(&header),
            rfc_example() + Duration::from_millis(400)
        ));
        assert!(!is_not_modified(
            Some(&header),
            rfc_example() + Duration::from_secs(1)
        ));
        assert!(!is_not_modified(None, rfc_example()));
        assert!(!is_not_modified(Some("garbage"), rfc_example()));
    }
}
