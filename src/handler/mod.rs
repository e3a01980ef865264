//! Request handler module
//!
//! Routes each request to the JSON API, a static mount or the public site.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
