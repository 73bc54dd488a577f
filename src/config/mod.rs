// Configuration module entry point
// Loads configuration and builds the shared server state

mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

use crate::error::ServerError;

// Re-export public types
pub use state::ServerState;
pub use types::{Config, LoggingConfig, ServerConfig};

/// Config file looked up in the working directory (extension optional)
pub const DEFAULT_CONFIG_FILE: &str = "gzserve";

impl Config {
    /// Load configuration from `gzserve.toml` (optional) and `GZSERVE_*` env vars
    pub fn load() -> Result<Self, ServerError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// A missing file is not an error; built-in defaults apply.
    /// Environment variables override the file, e.g. `GZSERVE_SERVER__PORT=9000`.
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(config_path).required(false))
            .add_source(
                ::config::Environment::with_prefix("GZSERVE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.root", ".")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ServerError::Host(self.server.host.clone()))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}
