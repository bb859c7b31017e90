use std::path::PathBuf;

use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError, FileConfig};

/// Application configuration wrapper.
///
/// Resolution order: explicit builder values, then `BIZDESK_API_URL` /
/// `BIZDESK_DATA_DIR`, then `config.toml` in the user config directory,
/// then defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    app: AppConfig,
}

impl Config {
    /// Load configuration from the environment and the optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder();
        if let Ok(url) = std::env::var("BIZDESK_API_URL") {
            builder = builder.server_url(url);
        }
        if let Ok(dir) = std::env::var("BIZDESK_DATA_DIR") {
            builder = builder.data_dir(dir);
        }
        if let Some(path) = Self::config_file_path() {
            match std::fs::read_to_string(&path) {
                Ok(source) => {
                    tracing::debug!(path = %path.display(), "loading config file");
                    builder = builder.merge_file(FileConfig::from_toml(&source)?);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "config file unreadable, ignoring");
                }
            }
        }
        Self::with_builder(builder)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
        })
    }

    /// Path of the optional `config.toml`
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bizdesk").join("config.toml"))
    }

    /// Get the full URL for an API endpoint; `path` is relative to `/api`
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        &self.app.server_url
    }

    /// Directory for persisted storage; falls back to the platform data dir
    pub fn data_dir(&self) -> PathBuf {
        self.app.data_dir.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
            path.push("bizdesk");
            path
        })
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }
}
