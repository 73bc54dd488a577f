//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static file
//! serving, then the response hooks that run on every response.

use crate::config::ServerState;
use crate::handler::{encoding, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderValue, IF_MODIFIED_SINCE, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const SERVER_NAME: &str = concat!("gzserve/", env!("CARGO_PKG_VERSION"));

/// Request context encapsulating information needed for request processing
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Raw URI path, still percent-encoded
    pub path: String,
    pub query: Option<String>,
    pub version: Version,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub remote_addr: Option<SocketAddr>,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>, remote_addr: Option<SocketAddr>) -> Self {
        let headers = req.headers();
        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            version: req.version(),
            is_head: *req.method() == Method::HEAD,
            if_modified_since: header_string(headers, &IF_MODIFIED_SINCE),
            referer: header_string(headers, &REFERER),
            user_agent: header_string(headers, &USER_AGENT),
            remote_addr,
        }
    }
}

fn header_string(headers: &HeaderMap, name: &hyper::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Main entry point for HTTP request handling
///
/// Never fails: every problem becomes an HTTP status.
pub async fn handle_request<B>(
    req: Request<B>,
    remote_addr: Option<SocketAddr>,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let ctx = RequestContext::from_request(&req, remote_addr);

    let mut response = match ctx.method {
        Method::GET | Method::HEAD => static_files::serve(&ctx, &state).await,
        _ => {
            log::debug!("Method not allowed: {}", ctx.method);
            http::build_405_response()
        }
    };

    // Hooks run on every response, success or error
    encoding::apply_content_encoding(&ctx.path, &mut response);
    response
        .headers_mut()
        .insert(SERVER, HeaderValue::from_static(SERVER_NAME));

    if state.access_log {
        log_access(&ctx, &response, started, &state.access_log_format);
    }

    Ok(response)
}

fn log_access(
    ctx: &RequestContext,
    response: &Response<Full<Bytes>>,
    started: Instant,
    format: &str,
) {
    let remote_addr = ctx
        .remote_addr
        .map_or_else(|| "-".to_string(), |addr| addr.ip().to_string());
    let mut entry = AccessLogEntry::new(remote_addr, ctx.method.to_string(), ctx.path.clone());
    entry.query.clone_from(&ctx.query);
    entry.http_version = version_label(ctx.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer.clone_from(&ctx.referer);
    entry.user_agent.clone_from(&ctx.user_agent);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry, format);
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
