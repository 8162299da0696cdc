//! Display model of a listing page
//!
//! Everything here is derived deterministically from [`Entry`] values and a
//! reference instant, so renderers never touch the filesystem.

use super::entry::Entry;
use super::humanize;
use crate::http::uri;
use serde::Serialize;
use std::time::SystemTime;

/// Which unit family sizes are printed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeUnits {
    #[default]
    Decimal,
    Binary,
}

impl SizeUnits {
    pub fn format(self, size: u64) -> String {
        match self {
            Self::Decimal => humanize::bytes(size),
            Self::Binary => humanize::iec_bytes(size),
        }
    }
}

/// Display-ready row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEntry {
    /// Entry name, with a trailing `/` for directories
    pub name: String,
    /// Humanized size, `-` for directories
    pub size: String,
    pub mod_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// One breadcrumb step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    pub href: String,
}

/// Data handed to the renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingPage {
    /// Decoded web path, always starting and ending with `/`
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breadcrumb: Vec<Crumb>,
    pub items: Vec<DisplayEntry>,
}

impl ListingPage {
    /// Page for the web: every item links below `url_path`, with breadcrumbs
    ///
    /// `url_path` is the percent-encoded directory URL.
    pub fn new(url_path: &str, entries: &[Entry], units: SizeUnits, now: SystemTime) -> Self {
        let base = normalize_dir_path(url_path);
        let items = entries
            .iter()
            .map(|entry| prettify(entry, Some(&base), units, now))
            .collect();

        Self {
            path: uri::decode_lossy(&base),
            breadcrumb: breadcrumb(&base),
            items,
        }
    }

    /// Page for a terminal: no links, no breadcrumbs
    pub fn plain(label: &str, entries: &[Entry], units: SizeUnits, now: SystemTime) -> Self {
        Self {
            path: label.to_string(),
            breadcrumb: Vec::new(),
            items: entries
                .iter()
                .map(|entry| prettify(entry, None, units, now))
                .collect(),
        }
    }
}

/// Convert an entry into its display form
///
/// `link_base` is the already-encoded URL of the containing directory,
/// ending with `/`. Without it the entry carries no link.
pub fn prettify(
    entry: &Entry,
    link_base: Option<&str>,
    units: SizeUnits,
    now: SystemTime,
) -> DisplayEntry {
    let (name, size) = if entry.is_dir {
        (format!("{}/", entry.name), "-".to_string())
    } else {
        (entry.name.clone(), units.format(entry.size))
    };

    let link = link_base.map(|base| {
        let mut href = format!("{base}{}", uri::encode_bytes(&entry.name_bytes()));
        if entry.is_dir {
            href.push('/');
        }
        href
    });

    DisplayEntry {
        name,
        size,
        mod_time: humanize::relative_time(entry.modified, now),
        link,
    }
}

/// Ancestor links for an encoded directory URL, root first
pub fn breadcrumb(url_path: &str) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb {
        label: "/".to_string(),
        href: "/".to_string(),
    }];

    let mut href = String::from("/");
    for segment in url_path.split('/').filter(|s| !s.is_empty()) {
        href.push_str(segment);
        href.push('/');
        crumbs.push(Crumb {
            label: uri::decode_lossy(segment),
            href: href.clone(),
        });
    }

    crumbs
}

fn normalize_dir_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}
