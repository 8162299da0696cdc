//! Directory lister
//!
//! Reads one directory per request, orders the entries (directories first,
//! then by name) and derives the display model consumed by the renderers.

mod entry;
pub mod humanize;
mod page;
pub mod render;

pub use entry::read_entries;
pub use page::{ListingPage, SizeUnits};
pub use render::{render_text, Template, TemplateError};
