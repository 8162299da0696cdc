//! Request handler module
//!
//! Maps request paths onto the served directory and answers with either a
//! listing page or the raw file.

mod files;
mod listing;
pub mod resolve;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
