//! Logger module
//!
//! Installs the `log` backend and provides the few structured log helpers the
//! server uses:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Connection error logging

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::LoggingConfig;
use crate::error::ServerError;
use log::LevelFilter;
use std::net::SocketAddr;
use std::path::Path;
use writer::{LogWriter, ACCESS_TARGET};

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> Result<(), ServerError> {
    let level: LevelFilter = config
        .level
        .parse()
        .map_err(|_| ServerError::LogLevel(config.level.clone()))?;

    let writer = LogWriter::new(
        level,
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
    .map_err(|source| ServerError::LogFile {
        path: config
            .access_log_file
            .clone()
            .or_else(|| config.error_log_file.clone())
            .unwrap_or_default(),
        source,
    })?;

    log::set_boxed_logger(Box::new(writer))?;
    log::set_max_level(max_level(level, config.access_log));
    Ok(())
}

/// Global filter for the `log` macros
///
/// Access lines are emitted at info, so the macros must let info through
/// whenever access logging is on; `LogWriter::enabled` filters the rest.
fn max_level(level: LevelFilter, access_log: bool) -> LevelFilter {
    if access_log {
        level.max(LevelFilter::Info)
    } else {
        level
    }
}

pub fn log_server_start(addr: &SocketAddr, root: &Path, config: &LoggingConfig) {
    log::info!("Serving at http://localhost:{}", addr.port());
    log::info!("Listening on: http://{addr}");
    log::info!("Document root: {}", root.display());
    if let Some(ref path) = config.access_log_file {
        log::info!("Access log: {path}");
    }
    if let Some(ref path) = config.error_log_file {
        log::info!("Error log: {path}");
    }
}

pub fn log_connection_error(err: &hyper::Error) {
    // Clients hanging up mid-response are routine
    if err.is_incomplete_message() || err.is_canceled() {
        log::debug!("Connection closed early: {err}");
    } else {
        log::warn!("Failed to serve connection: {err:?}");
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    log::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}
