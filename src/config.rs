//! Service configuration
//!
//! Loaded from a JSON file. Only `catalog` is required:
//!
//! ```json
//! {
//!   "catalog": "./catalog.json",
//!   "base_url": "http://localhost",
//!   "default_limit": 50,
//!   "max_limit": 250,
//!   "log_level": "info"
//! }
//! ```
//!
//! A relative `catalog` path is resolved against the config file's
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::endpoint::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::observability::Severity;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog file declaring the list resources (required)
    pub catalog: PathBuf,

    /// Origin that request paths are resolved against for page links
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Page size for resources that declare none
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Page-size ceiling for resources that declare none
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    "http://localhost".to_string()
}
fn default_limit() -> usize {
    DEFAULT_LIMIT
}
fn default_max_limit() -> usize {
    MAX_LIMIT
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&content)?;

        if config.catalog.is_relative() {
            if let Some(dir) = path.parent() {
                config.catalog = dir.join(&config.catalog);
            }
        }
        Ok(config)
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_limit == 0 {
            return Err(ConfigError::Invalid("max_limit must be > 0".into()));
        }
        if self.default_limit > self.max_limit {
            return Err(ConfigError::Invalid(format!(
                "default_limit {} exceeds max_limit {}",
                self.default_limit, self.max_limit
            )));
        }
        self.severity()?;
        self.base()?;
        Ok(())
    }

    /// The configured minimum log severity
    pub fn severity(&self) -> Result<Severity, ConfigError> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }

    /// The parsed base URL
    pub fn base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url '{}': {}", self.base_url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_json(r#"{"catalog": "c.json"}"#).unwrap();
        assert_eq!(config.base_url, "http://localhost");
        assert_eq!(config.default_limit, 50);
        assert_eq!(config.max_limit, 250);
        assert_eq!(config.severity().unwrap(), Severity::Info);
    }

    #[test]
    fn test_catalog_required() {
        assert!(matches!(
            Config::from_json("{}"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_limits_validated() {
        let err = Config::from_json(r#"{"catalog": "c", "default_limit": 300}"#).unwrap_err();
        assert!(err.to_string().contains("default_limit"));
        assert!(Config::from_json(r#"{"catalog": "c", "max_limit": 0, "default_limit": 0}"#).is_err());
    }

    #[test]
    fn test_log_level_validated() {
        assert!(Config::from_json(r#"{"catalog": "c", "log_level": "loud"}"#).is_err());
        let config = Config::from_json(r#"{"catalog": "c", "log_level": "WARN"}"#).unwrap();
        assert_eq!(config.severity().unwrap(), Severity::Warn);
    }

    #[test]
    fn test_base_url_validated() {
        assert!(Config::from_json(r#"{"catalog": "c", "base_url": "not a url"}"#).is_err());
    }
}
