//! HTTP protocol layer
//!
//! Protocol-level helpers shared by the asset handler and the relay's
//! plain-HTTP routes: content types, conditional requests, byte ranges,
//! and response builders.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

pub use range::{parse_range_header, RangeParseResult};
pub use response::{
    build_bad_request_response, build_health_response, build_internal_error_response,
    build_not_found_response, build_options_response, build_text_response,
};
