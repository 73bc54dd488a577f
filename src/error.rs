//! Error types
//!
//! `ServerError` covers everything that can stop the process before it starts
//! serving. `ResolveError` covers per-request failures, each of which becomes
//! an HTTP error status and never ends the process.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Startup failure
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid listen host '{0}'")]
    Host(String),

    #[error("invalid log level '{0}'")]
    LogLevel(String),

    #[error("failed to open log file '{path}': {source}")]
    LogFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("logger already installed")]
    LoggerInstalled(#[from] log::SetLoggerError),

    #[error("document root '{}' is not an accessible directory: {source}", .path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Failure to turn a request path into something servable
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("not found")]
    NotFound,

    #[error("forbidden")]
    Forbidden,

    #[error("read failed: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ServerError::Bind {
            addr: "0.0.0.0:8000".parse().unwrap(),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert!(err.to_string().starts_with("failed to bind 0.0.0.0:8000: "));

        let err = ResolveError::from(io::Error::other("disk gone"));
        assert_eq!(err.to_string(), "read failed: disk gone");
    }
}
