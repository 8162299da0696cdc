//! Raw file transfer
//!
//! Regular files are sent verbatim with content headers, conditional
//! request support and single byte ranges.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, ByteRange, FileHeaders};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fs::Metadata;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt};

pub async fn serve_file(
    ctx: &RequestContext<'_>,
    path: &Path,
    metadata: &Metadata,
) -> Response<Full<Bytes>> {
    let len = metadata.len();
    let modified = metadata.modified().ok();
    let etag = cache::etag_for(len, modified);
    let last_modified = modified.map(cache::http_date);

    if cache::is_not_modified(
        ctx.if_none_match.as_deref(),
        ctx.if_modified_since.as_deref(),
        &etag,
        modified,
    ) {
        return http::build_304_response(&etag, last_modified.as_deref());
    }

    let headers = FileHeaders {
        content_type: mime::content_type_for(path),
        etag: &etag,
        last_modified: last_modified.as_deref(),
    };

    match ByteRange::from_header(ctx.range.as_deref(), len) {
        ByteRange::Unsatisfiable => http::build_416_response(len),
        ByteRange::Partial { start, end } => {
            let body = if ctx.is_head {
                Ok(Bytes::new())
            } else {
                read_span(path, start, end).await
            };
            match body {
                Ok(body) => http::response::build_partial_response(body, start, end, len, &headers),
                Err(e) => read_failed(path, &e),
            }
        }
        ByteRange::Full => {
            let body = if ctx.is_head {
                Ok(Bytes::new())
            } else {
                fs::read(path).await.map(Bytes::from)
            };
            match body {
                Ok(body) => http::response::build_file_response(body, len, &headers),
                Err(e) => read_failed(path, &e),
            }
        }
    }
}

/// Read the inclusive span `start..=end`
async fn read_span(path: &Path, start: u64, end: u64) -> std::io::Result<Bytes> {
    let span = usize::try_from(end - start + 1)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let mut file = File::open(path).await?;
    file.seek(SeekFrom::Start(start)).await?;
    let mut buffer = vec![0; span];
    file.read_exact(&mut buffer).await?;
    Ok(Bytes::from(buffer))
}

fn read_failed(path: &Path, err: &std::io::Error) -> Response<Full<Bytes>> {
    logger::log_error(&format!("Failed to read file '{}': {err}", path.display()));
    http::build_500_response(&err.to_string())
}
