// Configuration module
// Loads the TOML config file, applies defaults, and validates required fields.

use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::logger::Logger;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Directory holding the SPA build output.
    pub static_dir: String,
    /// Index document served as SPA fallback, relative to `static_dir`.
    pub index_file: String,
    /// Bind address of the static asset listener.
    pub spa_addr: String,
    /// Bind address of the WebSocket relay listener.
    pub relay_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Per-connection read timeout in seconds.
    pub read_timeout: u64,
    /// Per-connection write timeout in seconds.
    pub write_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
    /// Optional log file; stdout/stderr when unset.
    pub log_file: Option<String>,
}

impl Config {
    /// Load configuration from `config.toml` in the working directory.
    ///
    /// The file itself is required; a missing or unparseable file is fatal
    /// before any listener binds. Individual fields fall back to documented
    /// defaults and can be overridden via `SERVER_`-prefixed environment
    /// variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the given file path (without extension).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(true))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.static_dir", "build")?
            .set_default("server.index_file", "index.html")?
            .set_default("server.spa_addr", "127.0.0.1:8000")?
            .set_default("server.relay_addr", "127.0.0.1:8001")?
            .set_default("performance.read_timeout", 15)?
            .set_default("performance.write_timeout", 15)?
            .set_default("logging.access_log", true)?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Required-field validation, applied after deserialization.
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.static_dir.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "server.static_dir must not be empty".to_string(),
            ));
        }
        if self.server.index_file.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "server.index_file must not be empty".to_string(),
            ));
        }
        for (name, value) in [
            ("server.spa_addr", &self.server.spa_addr),
            ("server.relay_addr", &self.server.relay_addr),
        ] {
            if value.parse::<SocketAddr>().is_err() {
                return Err(config::ConfigError::Message(format!(
                    "{name} is not a valid socket address: '{value}'"
                )));
            }
        }
        Ok(())
    }

    pub fn spa_socket_addr(&self) -> Result<SocketAddr, String> {
        self.server
            .spa_addr
            .parse()
            .map_err(|e| format!("Invalid SPA address: {e}"))
    }

    pub fn relay_socket_addr(&self) -> Result<SocketAddr, String> {
        self.server
            .relay_addr
            .parse()
            .map_err(|e| format!("Invalid relay address: {e}"))
    }

    /// Connection timeout derived from the read/write timeouts.
    pub fn connection_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(std::cmp::max(
            self.performance.read_timeout,
            self.performance.write_timeout,
        ))
    }
}

/// Read-only state shared by both listeners: configuration plus the
/// injected logger capability. Built once before either listener starts.
pub struct AppState {
    pub config: Config,
    pub logger: Logger,
}

impl AppState {
    pub fn new(config: Config, logger: Logger) -> Arc<Self> {
        Arc::new(Self { config, logger })
    }
}
