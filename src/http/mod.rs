//! HTTP protocol layer module
//!
//! Protocol helpers shared by the listing and raw file handlers, kept free of
//! any directory-listing logic.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;
pub mod uri;

pub use range::ByteRange;
pub use response::{
    build_304_response, build_403_response, build_404_response, build_405_response,
    build_416_response, build_500_response, build_503_response, build_listing_response,
    build_options_response, build_redirect_response, FileHeaders,
};
