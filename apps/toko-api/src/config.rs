//! Toko API configuration module.
//!
//! Layered with the `config` crate, later sources winning:
//!
//! ```text
//! built-in defaults ─► ./toko.toml (optional) ─► TOKO_* environment
//! ```
//!
//! | Key                    | Env var                     | Default          |
//! |------------------------|-----------------------------|------------------|
//! | `host`                 | `TOKO_HOST`                 | `127.0.0.1`      |
//! | `port`                 | `TOKO_PORT`                 | `8000`           |
//! | `database_path`        | `TOKO_DATABASE_PATH`        | `./data/toko.db` |
//! | `max_connections`      | `TOKO_MAX_CONNECTIONS`      | `5`              |
//! | `request_timeout_secs` | `TOKO_REQUEST_TIMEOUT_SECS` | `30`             |
//! | `seed`                 | `TOKO_SEED`                 | `false`          |

use config::{Config, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind.
    pub host: String,

    /// HTTP port.
    pub port: u16,

    /// SQLite database file.
    pub database_path: PathBuf,

    /// Pool size.
    pub max_connections: u32,

    /// Requests running longer than this get a 408 TIMEOUT envelope; an open
    /// transaction is rolled back when its future is dropped.
    pub request_timeout_secs: u64,

    /// Load the reference data set into an empty database on startup.
    pub seed: bool,
}

impl ApiConfig {
    /// Loads configuration from `toko.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(Environment::with_prefix("TOKO").try_parsing(true))
    }

    /// Builds the configuration with the given environment source on top of
    /// the defaults and the optional file.
    pub fn from_sources(env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8000_i64)?
            .set_default("database_path", "./data/toko.db")?
            .set_default("max_connections", 5_i64)?
            .set_default("request_timeout_secs", 30_i64)?
            .set_default("seed", false)?
            .add_source(File::with_name("toko").required(false))
            .add_source(env)
            .build()?;

        let config: ApiConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "request_timeout_secs".to_string(),
            ));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }
        self.bind_addr().map(|_| ())
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("host".to_string()))
    }

    /// Per-request deadline.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("TOKO")
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_sources(env(&[])).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!config.seed);
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8000");
    }

    #[test]
    fn test_environment_overrides() {
        let config = ApiConfig::from_sources(env(&[
            ("TOKO_PORT", "9090"),
            ("TOKO_DATABASE_PATH", "/tmp/toko-test.db"),
            ("TOKO_SEED", "true"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_path, PathBuf::from("/tmp/toko-test.db"));
        assert!(config.seed);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ApiConfig::from_sources(env(&[("TOKO_MAX_CONNECTIONS", "0")])),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            ApiConfig::from_sources(env(&[("TOKO_HOST", "not a host")])),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(ApiConfig::from_sources(env(&[("TOKO_PORT", "eighty")])).is_err());
    }
}
