//! Logger module
//!
//! Timestamped logging to stdout/stderr or an append-only log file.
//! The `Logger` is constructed once at startup and injected into the
//! components that need it (via `AppState`) rather than living in a
//! process-wide singleton.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::config::{Config, LoggingConfig};

/// Log output target
enum LogTarget {
    /// Info/access lines to stdout, errors to stderr
    Console,
    /// Everything to a single append-only file
    File(Mutex<File>),
}

/// Injected logging capability. Cheap to clone; all clones share one target.
#[derive(Clone)]
pub struct Logger {
    target: Arc<LogTarget>,
    access_log: bool,
}

impl Logger {
    /// Build a logger from the logging configuration.
    ///
    /// Returns an error if the configured log file cannot be opened.
    pub fn from_config(cfg: &LoggingConfig) -> io::Result<Self> {
        let target = match cfg.log_file.as_deref() {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Console,
        };
        Ok(Self {
            target: Arc::new(target),
            access_log: cfg.access_log,
        })
    }

    /// Console-only logger for tests and early startup errors.
    pub fn console() -> Self {
        Self {
            target: Arc::new(LogTarget::Console),
            access_log: true,
        }
    }

    pub fn info(&self, message: &str) {
        self.write_line("INFO", message, false);
    }

    pub fn error(&self, message: &str) {
        self.write_line("ERROR", message, true);
    }

    /// Fatal errors are logged like errors; the caller decides process exit.
    pub fn fatal(&self, message: &str) {
        self.write_line("FATAL", message, true);
    }

    /// Per-request access line, suppressed when access logging is disabled.
    pub fn access(&self, message: &str) {
        if self.access_log {
            self.write_line("ACCESS", message, false);
        }
    }

    fn write_line(&self, level: &str, message: &str, is_error: bool) {
        let line = format!(
            "{} [{level}] {message}",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f")
        );
        match self.target.as_ref() {
            LogTarget::Console => {
                if is_error {
                    eprintln!("{line}");
                } else {
                    println!("{line}");
                }
            }
            LogTarget::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{line}");
                }
            }
        }
    }
}

/// Open or create a log file for appending, creating parent directories.
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Startup banner listing both listeners, printed once before serving.
pub fn log_server_start(logger: &Logger, config: &Config) {
    logger.info("======================================");
    logger.info(&format!(
        "SPA being served at: http://{}",
        config.server.spa_addr
    ));
    logger.info(&format!(
        "Health check available at: http://{}/api/health",
        config.server.spa_addr
    ));
    logger.info(&format!(
        "WebSocket relay being served at: ws://{}/flutter",
        config.server.relay_addr
    ));
    logger.info(&format!("Static directory: {}", config.server.static_dir));
    logger.info("======================================");
}
