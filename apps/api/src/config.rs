//! # API Configuration
//!
//! ## Loading Order
//! ```text
//! defaults ──► TOML file ──► SHOPAGG_* environment ──► validate()
//!              (SHOPAGG_CONFIG or ./shopagg.toml, optional)
//! ```
//!
//! ## Example `shopagg.toml`
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//! database_path = "./shopagg.db"
//! max_connections = 5
//! query_timeout_secs = 10
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SHOPAGG_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "shopagg.toml";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Interface to bind.
    pub host: String,

    /// HTTP port.
    pub port: u16,

    /// SQLite database file, created when missing.
    pub database_path: PathBuf,

    /// Upper bound of the connection pool.
    pub max_connections: u32,

    /// Deadline of every storage call, in seconds.
    pub query_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_path: PathBuf::from("./shopagg.db"),
            max_connections: 5,
            query_timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    /// Loads the configuration.
    ///
    /// A missing file is not an error; the defaults apply. An unreadable or
    /// malformed file is.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            info!(?path, "Loading config from file");
            config = Self::from_file(&path)?;
        } else {
            debug!(?path, "Config file not found, using defaults");
        }

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `SHOPAGG_*` overrides. `lookup` reads one variable; tests pass
    /// a map instead of touching the process environment.
    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SHOPAGG_HOST") {
            self.host = host;
        }

        if let Some(port) = lookup("SHOPAGG_PORT") {
            self.port = parse_var("SHOPAGG_PORT", &port)?;
            debug!(port = self.port, "Overriding port from environment");
        }

        if let Some(path) = lookup("SHOPAGG_DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }

        if let Some(max) = lookup("SHOPAGG_MAX_CONNECTIONS") {
            self.max_connections = parse_var("SHOPAGG_MAX_CONNECTIONS", &max)?;
        }

        if let Some(secs) = lookup("SHOPAGG_QUERY_TIMEOUT_SECS") {
            self.query_timeout_secs = parse_var("SHOPAGG_QUERY_TIMEOUT_SECS", &secs)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.parse::<IpAddr>().is_err() {
            return Err(ConfigError::InvalidValue("host".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port".to_string()));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if self.query_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("query_timeout_secs".to_string()));
        }
        Ok(())
    }

    /// Address to bind. Only call on a validated config.
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = self.host.parse().unwrap_or(IpAddr::from([0, 0, 0, 0]));
        SocketAddr::new(ip, self.port)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    fn default_config_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string()))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file: {0}")]
    Parse(#[from] toml::de::Error),
}
