//! gzserve
//!
//! Serves a directory over HTTP/1.1 and marks every response whose request
//! path ends in `.gz` with `Content-Encoding: gzip`, so browsers transparently
//! decode pre-compressed assets.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::Config;
pub use error::ServerError;
pub use server::Server;
