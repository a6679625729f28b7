//! RON configuration parsing for the dashboard server

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Listen address (e.g., "0.0.0.0:8000")
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Database file; `None` keeps everything in memory
    #[serde(default)]
    pub database: Option<PathBuf>,
    /// Map centre reported with the summary
    #[serde(default)]
    pub coords: Coords,
    /// Scenario RON file; `None` uses the bundled scenario
    #[serde(default)]
    pub scenario: Option<PathBuf>,
    /// Seed the scenario before serving
    #[serde(default)]
    pub seed_on_start: bool,
    /// Refuse to seed a scenario with validation issues
    #[serde(default)]
    pub strict_validation: bool,
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Geographic point
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Default for Coords {
    /// Epicentre of the Las Malvinas earthquake
    fn default() -> Self {
        Self {
            lat: -35.020694,
            lng: -69.323999,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            database: None,
            coords: Coords::default(),
            scenario: None,
            seed_on_start: false,
            strict_validation: false,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_ron(&content)
    }

    /// Parse and validate configuration from RON text
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.listen_addr()?;
        Ok(config)
    }

    /// Parsed listen address
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen
            .parse()
            .map_err(|_| ConfigError::Validation(format!("invalid listen address: {}", self.listen)))
    }
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_ron("()").unwrap();
        assert_eq!(config.listen, "127.0.0.1:8000");
        assert!(config.database.is_none());
        assert_eq!(config.coords, Coords::default());
        assert!(!config.seed_on_start);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_ron(
            r#"(
                listen: "0.0.0.0:9090",
                database: Some("/tmp/sismo.db"),
                coords: (lat: -34.6, lng: -68.3),
                scenario: Some("scenarios/custom.ron"),
                seed_on_start: true,
                strict_validation: true,
                log_level: "debug",
            )"#,
        )
        .unwrap();

        assert_eq!(config.listen_addr().unwrap().port(), 9090);
        assert_eq!(config.database, Some(PathBuf::from("/tmp/sismo.db")));
        assert_eq!(config.coords.lat, -34.6);
        assert!(config.seed_on_start);
        assert!(config.strict_validation);
    }

    #[test]
    fn test_bundled_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/dashboard.ron");
        let config = Config::load(path).unwrap();
        assert_eq!(config.coords, Coords::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Config::load("/nonexistent/sismo/dashboard.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_invalid_listen() {
        let err = Config::from_ron(r#"(listen: "not-an-address")"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_ron("(listen: 8000").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
