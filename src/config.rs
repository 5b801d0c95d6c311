//! Settings for the Trello CLI
//!
//! Settings are optional. They live in `settings.toml` next to the credential
//! file and only tune the HTTP client and logging; every field has a default.
//! Precedence is defaults, then the settings file, then environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::ClientConfig;
use crate::constants::{env as env_constants, http, settings};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application settings for TOML serialization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// API root
    pub base_url: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            base_url: http::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for this crate's logs on stderr (error, warn, info, debug, trace)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: settings::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `settings.toml` from `config_dir`, then applies environment
    /// overrides from the process environment
    pub async fn load(config_dir: &Path) -> ConfigResult<Self> {
        let config = Self::load_from_dir(config_dir).await?;
        Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Loads `settings.toml` from `config_dir`; a missing file yields defaults
    pub async fn load_from_dir(config_dir: &Path) -> ConfigResult<Self> {
        let path = Self::settings_path(config_dir);
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(&path).await
    }

    pub fn settings_path(config_dir: &Path) -> PathBuf {
        config_dir.join(settings::SETTINGS_FILE)
    }

    /// Load settings from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig =
            toml::from_str(&content).map_err(|source| ConfigError::InvalidFormat {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Loaded settings from: {}", path.display());
        Ok(config)
    }

    /// Applies `TRELLO_API_BASE_URL` through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(env_constants::BASE_URL).filter(|v| !v.trim().is_empty()) {
            debug!("API base URL overridden from environment: {}", base_url);
            self.client.base_url = base_url.trim().to_string();
        }
        self
    }

    /// Log level, validated
    pub fn log_level(&self) -> ConfigResult<tracing::Level> {
        self.logging
            .level
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: "Expected one of error, warn, info, debug, trace".to_string(),
            })
    }

    /// Convert to runtime client configuration
    pub fn client_config(&self) -> ConfigResult<ClientConfig> {
        self.client.to_runtime_config()
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ConfigResult<ClientConfig> {
        for (field, value) in [
            ("client.request_timeout_secs", self.request_timeout_secs),
            ("client.connect_timeout_secs", self.connect_timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    reason: "Timeouts must be at least one second".to_string(),
                });
            }
        }

        Ok(ClientConfig {
            base_url: self.base_url.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.client.base_url, http::DEFAULT_BASE_URL);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.log_level().unwrap(), tracing::Level::WARN);

        let client = config.client_config().unwrap();
        assert_eq!(client.request_timeout, http::DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_missing_settings_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig::load_from_dir(temp_dir.path()).await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_partial_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = AppConfig::settings_path(temp_dir.path());
        tokio::fs::write(
            &path,
            r#"
[client]
request_timeout_secs = 5

[logging]
level = "debug"
"#,
        )
        .await
        .unwrap();

        let config = AppConfig::load_from_dir(temp_dir.path()).await.unwrap();

        assert_eq!(config.client.request_timeout_secs, 5);
        assert_eq!(config.logging.level, "debug");
        // Unspecified values keep their defaults
        assert_eq!(config.client.base_url, http::DEFAULT_BASE_URL);
        assert_eq!(
            config.client.connect_timeout_secs,
            http::CONNECT_TIMEOUT.as_secs()
        );
    }

    #[tokio::test]
    async fn test_invalid_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = AppConfig::settings_path(temp_dir.path());
        tokio::fs::write(&path, "[client\nbase_url = ").await.unwrap();

        let result = AppConfig::load_from_dir(temp_dir.path()).await;
        assert!(matches!(result, Err(ConfigError::InvalidFormat { .. })));
    }

    #[test]
    fn test_env_override_base_url() {
        let config = AppConfig::default().with_env_overrides(|name| {
            (name == "TRELLO_API_BASE_URL").then(|| "http://127.0.0.1:4010/1".to_string())
        });
        assert_eq!(config.client.base_url, "http://127.0.0.1:4010/1");

        let untouched = AppConfig::default().with_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(untouched.client.base_url, http::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = AppConfig::default();
        config.client.connect_timeout_secs = 0;
        assert!(matches!(
            config.client_config(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.log_level().is_err());
    }
}
