//! Log writer module
//!
//! Backend for the `log` facade. Routes records to stdout/stderr or log files:
//! access records and info-level messages share one target, everything else
//! (warnings, errors, debug diagnostics) goes to the other.

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Log target used by access log records
pub const ACCESS_TARGET: &str = "access";

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Write to stderr
    Stderr,
    /// Write to file
    File(Mutex<File>),
}

/// Thread-safe log writer
pub struct LogWriter {
    level: LevelFilter,
    /// Access and info target
    access: LogTarget,
    /// Warning, error and debug target
    error: LogTarget,
}

impl LogWriter {
    /// Create a new log writer with optional file paths
    pub fn new(
        level: LevelFilter,
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
    ) -> io::Result<Self> {
        let access = match access_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };

        Ok(Self {
            level,
            access,
            error,
        })
    }

    fn target_for(&self, record: &Record) -> &LogTarget {
        if record.target() == ACCESS_TARGET {
            return &self.access;
        }
        match record.level() {
            Level::Info => &self.access,
            Level::Error | Level::Warn | Level::Debug | Level::Trace => &self.error,
        }
    }
}

impl Log for LogWriter {
    /// Access records bypass the level filter; `access_log` alone switches them
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target() == ACCESS_TARGET || metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let target = self.target_for(record);
        // Access entries carry their own timestamp
        if record.target() == ACCESS_TARGET {
            write_to_target(target, &record.args().to_string());
        } else {
            let line = format!(
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.args()
            );
            write_to_target(target, &line);
        }
    }

    fn flush(&self) {
        for target in [&self.access, &self.error] {
            if let LogTarget::File(file) = target {
                if let Ok(mut f) = file.lock() {
                    let _ = f.flush();
                }
            }
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Write message to log target
fn write_to_target(target: &LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => {
            println!("{message}");
        }
        LogTarget::Stderr => {
            eprintln!("{message}");
        }
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    fn emit(writer: &LogWriter, level: Level, target: &str, message: &str) {
        writer.log(
            &Record::builder()
                .level(level)
                .target(target)
                .args(format_args!("{message}"))
                .build(),
        );
    }

    #[test]
    fn test_routes_records_to_files() {
        let temp = TempDir::new().unwrap();
        let access = temp.child("logs/access.log");
        let error = temp.child("logs/error.log");

        let writer = LogWriter::new(
            LevelFilter::Info,
            access.path().to_str(),
            error.path().to_str(),
        )
        .unwrap();

        emit(&writer, Level::Info, ACCESS_TARGET, "GET /index.html 200");
        emit(&writer, Level::Info, "gzserve", "listening");
        emit(&writer, Level::Warn, "gzserve", "traversal blocked");
        emit(&writer, Level::Debug, "gzserve", "filtered out");
        writer.flush();

        let access_log = std::fs::read_to_string(access.path()).unwrap();
        let error_log = std::fs::read_to_string(error.path()).unwrap();

        assert!(access_log.starts_with("GET /index.html 200\n"));
        assert!(access_log.contains("[INFO] listening"));
        assert!(!access_log.contains("filtered out"));
        assert!(error_log.contains("[WARN] traversal blocked"));
        assert!(!error_log.contains("listening"));
    }

    #[test]
    fn test_debug_stays_out_of_access_log() {
        let temp = TempDir::new().unwrap();
        let access = temp.child("access.log");
        let error = temp.child("error.log");

        let writer = LogWriter::new(
            LevelFilter::Trace,
            access.path().to_str(),
            error.path().to_str(),
        )
        .unwrap();

        emit(&writer, Level::Debug, "gzserve", "connection closed early");
        emit(&writer, Level::Trace, "gzserve", "polling");
        writer.flush();

        let access_log = std::fs::read_to_string(access.path()).unwrap();
        let error_log = std::fs::read_to_string(error.path()).unwrap();
        assert!(access_log.is_empty());
        assert!(error_log.contains("[DEBUG] connection closed early"));
        assert!(error_log.contains("[TRACE] polling"));
    }

    #[test]
    fn test_access_records_ignore_level() {
        let temp = TempDir::new().unwrap();
        let access = temp.child("access.log");

        let writer = LogWriter::new(LevelFilter::Warn, access.path().to_str(), None).unwrap();
        assert!(writer.enabled(
            &Metadata::builder()
                .level(Level::Info)
                .target(ACCESS_TARGET)
                .build()
        ));

        emit(&writer, Level::Info, ACCESS_TARGET, "GET /app.js.gz 200");
        emit(&writer, Level::Info, "gzserve", "startup noise");
        writer.flush();

        let access_log = std::fs::read_to_string(access.path()).unwrap();
        assert_eq!(access_log, "GET /app.js.gz 200\n");
    }
}
