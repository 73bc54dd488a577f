//! Content-Encoding hook
//!
//! Files ending in `.gz` are stored already gzip-compressed. The hook only
//! looks at the request path, never at the bytes, so it applies equally to
//! successful, redirect and error responses.

use hyper::header::{HeaderValue, CONTENT_ENCODING};
use hyper::Response;

const GZIP_SUFFIX: &str = ".gz";

/// Whether a raw request path names a pre-compressed file (case-sensitive)
pub fn is_gzip_path(request_path: &str) -> bool {
    request_path.ends_with(GZIP_SUFFIX)
}

/// Add `Content-Encoding: gzip` when the request path ends in `.gz`
///
/// Must run before the response is handed back to the connection, since
/// headers are written first.
pub fn apply_content_encoding<B>(request_path: &str, response: &mut Response<B>) {
    if is_gzip_path(request_path) {
        response
            .headers_mut()
            .insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn test_suffix_match() {
        assert!(is_gzip_path("/archive.tar.gz"));
        assert!(is_gzip_path("/Build/game.data.gz"));
        assert!(is_gzip_path("/.gz"));
        assert!(!is_gzip_path("/archive.GZ"));
        assert!(!is_gzip_path("/archive.tgz"));
        assert!(!is_gzip_path("/archive.gzip"));
        assert!(!is_gzip_path("/archive.gz/"));
        assert!(!is_gzip_path("/readme.txt"));
    }

    #[test]
    fn test_applies_regardless_of_status() {
        let mut response = Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(())
            .unwrap();
        apply_content_encoding("/missing.gz", &mut response);
        assert_eq!(response.headers()[CONTENT_ENCODING], "gzip");
    }

    #[test]
    fn test_leaves_other_paths_alone() {
        let mut response = Response::new(());
        apply_content_encoding("/readme.txt", &mut response);
        assert!(response.headers().get(CONTENT_ENCODING).is_none());
    }
}
