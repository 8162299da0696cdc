//! HTTP response builders
//!
//! Builder failures never panic: they are logged and replaced by an empty
//! response.

use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

type HttpResponse = Response<Full<Bytes>>;

/// Validators attached to a file response
pub struct FileHeaders<'a> {
    pub content_type: &'a str,
    pub etag: &'a str,
    pub last_modified: Option<&'a str>,
}

impl FileHeaders<'_> {
    fn apply(&self, mut builder: Builder) -> Builder {
        builder = builder
            .header("Content-Type", self.content_type)
            .header("Accept-Ranges", "bytes")
            .header("ETag", self.etag);
        if let Some(date) = self.last_modified {
            builder = builder.header("Last-Modified", date);
        }
        builder
    }
}

/// Rendered listing page (HTML or JSON); HEAD keeps the length, drops the body
pub fn build_listing_response(content: String, content_type: &str, is_head: bool) -> HttpResponse {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    finish(
        "listing",
        Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", content_type)
            .header("Content-Length", content_length)
            .header("Cache-Control", "no-cache"),
        body,
    )
}

/// Whole file, verbatim
pub fn build_file_response(body: Bytes, len: u64, headers: &FileHeaders<'_>) -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Length", len);
    finish("200", headers.apply(builder), body)
}

/// 206 Partial Content for an inclusive byte span
pub fn build_partial_response(
    body: Bytes,
    start: u64,
    end: u64,
    total: u64,
    headers: &FileHeaders<'_>,
) -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header("Content-Length", end - start + 1)
        .header("Content-Range", format!("bytes {start}-{end}/{total}"));
    finish("206", headers.apply(builder), body)
}

pub fn build_304_response(etag: &str, last_modified: Option<&str>) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag);
    if let Some(date) = last_modified {
        builder = builder.header("Last-Modified", date);
    }
    finish("304", builder, Bytes::new())
}

/// 301 to the canonical (slash-terminated) directory URL
pub fn build_redirect_response(location: &str) -> HttpResponse {
    finish(
        "301",
        Response::builder()
            .status(StatusCode::MOVED_PERMANENTLY)
            .header("Location", location)
            .header("Content-Type", "text/plain; charset=utf-8"),
        Bytes::from(format!("Moved Permanently: {location}")),
    )
}

pub fn build_403_response() -> HttpResponse {
    plain_text(StatusCode::FORBIDDEN, "403 Forbidden".to_string())
}

pub fn build_404_response() -> HttpResponse {
    plain_text(StatusCode::NOT_FOUND, "404 Not Found".to_string())
}

pub fn build_405_response() -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Allow", "GET, HEAD, OPTIONS");
    finish("405", builder, Bytes::from("405 Method Not Allowed"))
}

pub fn build_416_response(total: u64) -> HttpResponse {
    let builder = Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Content-Range", format!("bytes */{total}"));
    finish("416", builder, Bytes::from("416 Range Not Satisfiable"))
}

/// 500 carrying the underlying error text
pub fn build_500_response(message: &str) -> HttpResponse {
    plain_text(StatusCode::INTERNAL_SERVER_ERROR, format!("{message}\n"))
}

/// The handler did not finish within the request timeout
pub fn build_503_response() -> HttpResponse {
    plain_text(StatusCode::SERVICE_UNAVAILABLE, "503 Service Unavailable".to_string())
}

/// OPTIONS reply, with CORS preflight headers when enabled
pub fn build_options_response(enable_cors: bool) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Range, If-None-Match, If-Modified-Since")
            .header("Access-Control-Max-Age", "86400");
    }

    finish("OPTIONS", builder, Bytes::new())
}

fn plain_text(status: StatusCode, text: String) -> HttpResponse {
    let builder = Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8");
    finish(status.as_str(), builder, Bytes::from(text))
}

fn finish(label: &str, builder: Builder, body: Bytes) -> HttpResponse {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to build {label} response: {e}"));
        Response::new(Full::new(Bytes::new()))
    })
}
