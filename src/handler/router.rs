//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, path
//! resolution and dispatch to the listing or raw file handlers.

use crate::config::{AppState, HttpConfig};
use crate::handler::{files, listing, resolve};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{self, HeaderName, HeaderValue};
use hyper::http::request::Parts;
use hyper::{HeaderMap, Method, Request, Response, Version};
use std::convert::Infallible;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::fs;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    /// Render listings as JSON instead of HTML
    pub wants_json: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub range: Option<String>,
}

impl<'a> RequestContext<'a> {
    fn from_parts(parts: &'a Parts) -> Self {
        let headers = &parts.headers;
        let query = parts.uri.query();
        Self {
            path: parts.uri.path(),
            query,
            is_head: parts.method == Method::HEAD,
            wants_json: wants_json(query, header_str(headers, &header::ACCEPT)),
            if_none_match: header_str(headers, &header::IF_NONE_MATCH).map(ToString::to_string),
            if_modified_since: header_str(headers, &header::IF_MODIFIED_SINCE)
                .map(ToString::to_string),
            range: header_str(headers, &header::RANGE).map(ToString::to_string),
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    // Request bodies are never read
    let (parts, _) = req.into_parts();

    let mut response = match check_http_method(&parts.method, state.config.http.enable_cors) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext::from_parts(&parts);
            route_request(&ctx, &state).await
        }
    };

    apply_common_headers(&mut response, &state.config.http);

    if state.config.logging.access_log {
        let entry = access_entry(&parts, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Resolve the path under the root and dispatch on what it names
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let target = match resolve::resolve(
        &state.root,
        ctx.path,
        state.config.listing.restrict_to_root,
    ) {
        Ok(target) => target,
        Err(e) => {
            logger::log_warning(&format!("Refused '{}': {e}", ctx.path));
            return http::build_403_response();
        }
    };

    let metadata = match fs::metadata(&target.fs_path).await {
        Ok(m) => m,
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            return http::build_404_response();
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to stat '{}': {e}",
                target.fs_path.display()
            ));
            return http::build_500_response(&e.to_string());
        }
    };

    if metadata.is_dir() {
        if !target.url_path.ends_with('/') {
            let mut location = target.url_path.clone();
            location.push('/');
            if let Some(query) = ctx.query {
                location.push('?');
                location.push_str(query);
            }
            return http::build_redirect_response(&location);
        }
        return listing::serve_listing(ctx, state, &target).await;
    }

    if metadata.is_file() {
        return files::serve_file(ctx, &target.fs_path, &metadata).await;
    }

    // Sockets, fifos and devices are not served
    http::build_404_response()
}

fn wants_json(query: Option<&str>, accept: Option<&str>) -> bool {
    let by_query = query.is_some_and(|q| q.split('&').any(|pair| pair == "format=json"));
    let by_accept =
        accept.is_some_and(|a| a.contains("application/json") && !a.contains("text/html"));
    by_query || by_accept
}

fn apply_common_headers(response: &mut Response<Full<Bytes>>, http_config: &HttpConfig) {
    if let Ok(server) = HeaderValue::from_str(&http_config.server_name) {
        response.headers_mut().insert(header::SERVER, server);
    }
    if http_config.enable_cors {
        response.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    }
}

fn access_entry(
    parts: &Parts,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = version_label(parts.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_str(&parts.headers, &header::REFERER).map(ToString::to_string);
    entry.user_agent = header_str(&parts.headers, &header::USER_AGENT).map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
