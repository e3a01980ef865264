//! HTTP protocol layer module
//!
//! Protocol helpers shared by the static file handler and the JSON API.

pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::ByteRange;
pub use response::{
    apply_cors, build_404_response, build_405_response, build_416_response,
    build_health_response, build_options_response,
};
