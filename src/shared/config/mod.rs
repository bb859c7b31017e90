//! Application configuration module
//!
//! Provides the validated configuration every client component is built from.
//! Values can come from the builder, a `config.toml` file, or both (builder
//! values win).

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default server URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Default quiet period before a quick search is dispatched
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Default number of quick-search hits requested
pub const DEFAULT_QUICK_SEARCH_LIMIT: u32 = 10;

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Server URL, without the `/api` prefix
    pub server_url: String,
    /// Directory holding persisted key/value storage
    pub data_dir: Option<PathBuf>,
    /// Quick search quiet period
    pub search_debounce: Duration,
    /// Quick search hit limit
    pub quick_search_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            data_dir: None,
            search_debounce: Duration::from_millis(DEFAULT_SEARCH_DEBOUNCE_MS),
            quick_search_limit: DEFAULT_QUICK_SEARCH_LIMIT,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.server_url.clone()));
        }
        if self.quick_search_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "quick_search_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// On-disk representation of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub search_debounce_ms: Option<u64>,
    pub quick_search_limit: Option<u32>,
}

impl FileConfig {
    /// Parse a TOML document
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    data_dir: Option<PathBuf>,
    search_debounce: Option<Duration>,
    quick_search_limit: Option<u32>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the storage directory
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set the quick search quiet period
    pub fn search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = Some(debounce);
        self
    }

    /// Set the quick search hit limit
    pub fn quick_search_limit(mut self, limit: u32) -> Self {
        self.quick_search_limit = Some(limit);
        self
    }

    /// Fill unset values from a parsed config file
    pub fn merge_file(mut self, file: FileConfig) -> Self {
        self.server_url = self.server_url.or(file.server_url);
        self.data_dir = self.data_dir.or(file.data_dir);
        self.search_debounce = self
            .search_debounce
            .or(file.search_debounce_ms.map(Duration::from_millis));
        self.quick_search_limit = self.quick_search_limit.or(file.quick_search_limit);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            server_url: self
                .server_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.server_url),
            data_dir: self.data_dir,
            search_debounce: self.search_debounce.unwrap_or(defaults.search_debounce),
            quick_search_limit: self.quick_search_limit.unwrap_or(defaults.quick_search_limit),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("config file parse error: {0}")]
    Parse(String),
}
