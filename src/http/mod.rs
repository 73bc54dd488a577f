//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from path
//! resolution and the filesystem.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_301_response, build_304_response, build_403_response, build_404_response,
    build_405_response, build_500_response,
};
