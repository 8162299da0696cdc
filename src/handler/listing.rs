//! Directory listing pages

use crate::config::AppState;
use crate::handler::resolve::Target;
use crate::handler::router::RequestContext;
use crate::http;
use crate::listing::{self, ListingPage};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::time::SystemTime;

/// Read the directory behind `target` and render it
///
/// The directory is read fresh on every request; a failed read turns the
/// whole response into a 500.
pub async fn serve_listing(
    ctx: &RequestContext<'_>,
    state: &AppState,
    target: &Target,
) -> Response<Full<Bytes>> {
    let entries =
        match listing::read_entries(&target.fs_path, state.config.listing.show_hidden).await {
            Ok(entries) => entries,
            Err(e) => {
                logger::log_error(&format!("Failed to list '{}': {e}", target.web_path));
                return http::build_500_response(&e.to_string());
            }
        };

    logger::log_debug(&format!(
        "Listing {} ({} entries)",
        target.web_path,
        entries.len()
    ));

    let page = ListingPage::new(
        &target.url_path,
        &entries,
        state.config.listing.size_units(),
        SystemTime::now(),
    );

    if ctx.wants_json {
        return match serde_json::to_string_pretty(&page) {
            Ok(json) => http::build_listing_response(json, "application/json", ctx.is_head),
            Err(e) => {
                logger::log_error(&format!("Failed to serialize listing: {e}"));
                http::build_500_response(&e.to_string())
            }
        };
    }

    let html = state
        .template
        .render(&page, &state.config.http.server_name);
    http::build_listing_response(html, "text/html; charset=utf-8", ctx.is_head)
}
