//! Static file serving module
//!
//! Maps request paths onto the document root and builds file, directory
//! index, listing, redirect and error responses.

use crate::config::ServerState;
use crate::error::ResolveError;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// Filesystem entry a request path resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    Directory(PathBuf),
}

/// File contents ready to send, or a conditional-GET hit
enum Loaded {
    Content { data: Vec<u8>, last_modified: String },
    NotModified { last_modified: String },
}

/// Serve a GET or HEAD request from the document root
pub async fn serve(ctx: &RequestContext, state: &ServerState) -> Response<Full<Bytes>> {
    match resolve(&state.root, &ctx.path).await {
        Ok(Resolved::File(path)) => serve_file(ctx, &path).await,
        Ok(Resolved::Directory(dir)) => serve_directory(ctx, state, &dir).await,
        Err(err) => error_response(&err),
    }
}

/// Resolve a raw (percent-encoded) request path under `root`
///
/// `root` must be canonical. `..` segments are rejected outright; symlinks
/// are followed but must land inside `root`.
pub async fn resolve(root: &Path, request_path: &str) -> Result<Resolved, ResolveError> {
    let Ok(decoded) = percent_decode_str(request_path).decode_utf8() else {
        return Err(ResolveError::NotFound);
    };

    let mut candidate = root.to_path_buf();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                log::warn!("Path traversal attempt blocked: {request_path}");
                return Err(ResolveError::Forbidden);
            }
            s if s.contains(|c: char| c == '\\' || c == '\0') => {
                log::warn!("Rejected path segment in request: {request_path}");
                return Err(ResolveError::Forbidden);
            }
            s => candidate.push(s),
        }
    }

    let canonical = contained(root, &candidate).await?;
    let metadata = fs::metadata(&canonical).await.map_err(classify_lookup_error)?;

    if metadata.is_dir() {
        Ok(Resolved::Directory(candidate))
    } else if decoded.ends_with('/') {
        // A file cannot be addressed as a directory
        Err(ResolveError::NotFound)
    } else {
        Ok(Resolved::File(candidate))
    }
}

/// Canonicalize `path` and require it to stay under `root`
async fn contained(root: &Path, path: &Path) -> Result<PathBuf, ResolveError> {
    let canonical = fs::canonicalize(path)
        .await
        .map_err(classify_lookup_error)?;
    if canonical.starts_with(root) {
        Ok(canonical)
    } else {
        log::warn!(
            "Path traversal attempt blocked: {} -> {}",
            path.display(),
            canonical.display()
        );
        Err(ResolveError::Forbidden)
    }
}

/// Lookup failures are "not found" unless the filesystem refused access
fn classify_lookup_error(err: io::Error) -> ResolveError {
    if err.kind() == io::ErrorKind::PermissionDenied {
        ResolveError::Forbidden
    } else {
        ResolveError::NotFound
    }
}

async fn serve_directory(
    ctx: &RequestContext,
    state: &ServerState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    // Relative links in the page only work from the slash form
    if !ctx.path.ends_with('/') {
        return http::build_301_response(&directory_location(&ctx.path, ctx.query.as_deref()));
    }

    for index_file in &state.index_files {
        let index_path = dir.join(index_file);
        if is_servable_file(&state.root, &index_path).await {
            return serve_file(ctx, &index_path).await;
        }
    }

    match listing::read_entries(dir).await {
        Ok(entries) => {
            let display_path = percent_decode_str(&ctx.path).decode_utf8_lossy();
            let html = listing::render_listing(&display_path, &entries);
            http::response::build_html_response(html, ctx.is_head)
        }
        Err(e) => {
            log::warn!("No permission to list directory '{}': {e}", dir.display());
            http::build_404_response()
        }
    }
}

/// Slash form of a directory path for `Location`
///
/// Leading slashes collapse to one: `//host/dir` would otherwise be read by
/// clients as a protocol-relative URL pointing at another host.
fn directory_location(path: &str, query: Option<&str>) -> String {
    let path = path.trim_start_matches('/');
    match query {
        Some(query) => format!("/{path}/?{query}"),
        None => format!("/{path}/"),
    }
}

async fn is_servable_file(root: &Path, path: &Path) -> bool {
    match contained(root, path).await {
        Ok(canonical) => fs::metadata(&canonical)
            .await
            .is_ok_and(|meta| meta.is_file()),
        Err(_) => false,
    }
}

async fn serve_file(ctx: &RequestContext, path: &Path) -> Response<Full<Bytes>> {
    match load_file(path, ctx.if_modified_since.as_deref()).await {
        Ok(Loaded::Content {
            data,
            last_modified,
        }) => http::response::build_file_response(
            Bytes::from(data),
            mime::content_type_for_path(path),
            &last_modified,
            ctx.is_head,
        ),
        Ok(Loaded::NotModified { last_modified }) => http::build_304_response(&last_modified),
        Err(err) => {
            if let ResolveError::Io(ref e) = err {
                log::error!("Failed to read file '{}': {e}", path.display());
            }
            error_response(&err)
        }
    }
}

async fn load_file(path: &Path, if_modified_since: Option<&str>) -> Result<Loaded, ResolveError> {
    let metadata = fs::metadata(path).await.map_err(classify_lookup_error)?;
    let modified = metadata.modified().unwrap_or_else(|_| SystemTime::now());
    let last_modified = cache::format_http_date(modified);

    if cache::is_not_modified(if_modified_since, modified) {
        return Ok(Loaded::NotModified { last_modified });
    }

    let data = match fs::read(path).await {
        Ok(data) => data,
        // Removed between lookup and read
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ResolveError::NotFound),
        Err(e) => return Err(ResolveError::Io(e)),
    };

    Ok(Loaded::Content {
        data,
        last_modified,
    })
}

fn error_response(err: &ResolveError) -> Response<Full<Bytes>> {
    match err {
        ResolveError::NotFound => http::build_404_response(),
        ResolveError::Forbidden => http::build_403_response(),
        ResolveError::Io(_) => http::build_500_response(),
    }
}
