// Server state module
// Per-process values shared read-only by every request

use std::path::PathBuf;

use super::types::Config;

/// State handed to every request handler
///
/// Built once at startup and never mutated, so it is shared as a plain `Arc`.
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Canonical document root
    pub root: PathBuf,
    pub index_files: Vec<String>,
    pub access_log: bool,
    pub access_log_format: String,
}

impl ServerState {
    /// `root` must already be canonical; path containment checks compare against it
    pub fn new(config: &Config, root: PathBuf) -> Self {
        Self {
            root,
            index_files: config.server.index_files.clone(),
            access_log: config.logging.access_log,
            access_log_format: config.logging.access_log_format.clone(),
        }
    }
}
