//! Request handler module
//!
//! Responsible for request dispatch, static file resolution and the
//! `Content-Encoding` hook applied to every response.

pub mod encoding;
pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
