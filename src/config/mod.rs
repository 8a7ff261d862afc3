//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Riot API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiotConfig {
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Data Dragon version used for asset URLs
    #[serde(default = "default_ddragon_version")]
    pub ddragon_version: String,
}

fn default_api_key_env() -> String {
    "RIOT_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_ddragon_version() -> String {
    "14.10.1".to_string()
}

impl Default for RiotConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout(),
            ddragon_version: default_ddragon_version(),
        }
    }
}

/// Stats aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// How many of the newest matches a fresh snapshot covers
    #[serde(default = "default_window")]
    pub window: usize,
}

fn default_window() -> usize {
    crate::service::DEFAULT_WINDOW
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            window: default_window(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Directory served as the static dashboard
    #[serde(default = "default_dashboard_dir")]
    pub dashboard_dir: PathBuf,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

fn default_dashboard_dir() -> PathBuf {
    PathBuf::from("./dashboard")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            dashboard_dir: default_dashboard_dir(),
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/cache")
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub riot: RiotConfig,

    #[serde(default)]
    pub stats: StatsConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            riot: RiotConfig::default(),
            stats: StatsConfig::default(),
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.riot.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Riot API timeout must be greater than 0".to_string(),
            ));
        }

        if self.stats.window == 0 {
            return Err(ConfigError::ValidationError(
                "Stats window must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.riot.api_key_env, "RIOT_API_KEY");
        assert_eq!(config.stats.window, 10);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.cache.data_dir, PathBuf::from("./data/cache"));
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.riot.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_window() {
        let mut config = AppConfig::default();
        config.stats.window = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let toml_str = r#"
            log_level = "debug"

            [stats]
            window = 20
        "#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.stats.window, 20);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.riot.timeout_seconds, 10);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.stats.window, parsed.stats.window);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.stats.window, 10);
    }
}
