// Configuration module entry point
// Layered configuration resolved once at startup into an immutable struct

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig, StorageConfig};

impl Config {
    /// Load configuration from the default file path ("dataserver.toml")
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("dataserver")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Layering: coded defaults, then the optional file, then
    /// `DATASERVER_*` environment overrides (`__` separates sections,
    /// e.g. `DATASERVER_SERVER__PORT=9000`).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("DATASERVER").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("storage.root_dir", ".")?
            .set_default("storage.test_mode", false)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "plain")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.connection_timeout", 0)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
