//! Application configuration and persistence

use crate::error::{CountriesError, CountriesResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Top level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

/// Countries API endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, `/all` and `/alpha/{code}` are appended to it
    pub base_url: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://restcountries.com/v2".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl AppConfig {
    /// `<config dir>/countries/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("countries").join("config.toml"))
    }

    /// Load configuration from file, falling back to defaults when it does not exist
    pub async fn load_from_file(path: &Path) -> CountriesResult<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CountriesError::config_error(format!("Failed to read config: {}", e)))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| CountriesError::config_error(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> CountriesResult<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self)
            .map_err(|e| CountriesError::config_error(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CountriesError::config_error(format!("Failed to create config directory: {}", e))
            })?;
        }

        tokio::fs::write(path, content)
            .await
            .map_err(|e| CountriesError::config_error(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> CountriesResult<()> {
        let base_url = Url::parse(&self.api.base_url)
            .map_err(|e| CountriesError::config_error(format!("Invalid base URL: {}", e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(CountriesError::config_error(format!(
                "Base URL must use http or https, got {}",
                base_url.scheme()
            )));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(CountriesError::config_error("Request timeout must be greater than 0"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(CountriesError::config_error(format!(
                "Unknown log level '{}', expected one of {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Configured log level for the tracing subscriber
    pub fn log_level(&self) -> tracing::Level {
        match self.logging.level.as_str() {
            "trace" => tracing::Level::TRACE,
            "debug" => tracing::Level::DEBUG,
            "warn" => tracing::Level::WARN,
            "error" => tracing::Level::ERROR,
            _ => tracing::Level::INFO,
        }
    }
}
