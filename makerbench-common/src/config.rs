//! Configuration loading
//!
//! Bootstrap configuration is resolved in priority order:
//! 1. Command-line arguments (handled by the binary, highest priority)
//! 2. Environment variables
//! 3. TOML config file
//! 4. Compiled defaults (fallback)
//!
//! A missing config file is not an error: the service logs a warning and
//! starts with defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable holding the admin bearer token
pub const ENV_ADMIN_TOKEN: &str = "MAKERBENCH_ADMIN_TOKEN";
/// Environment variable holding the screenshot service key
pub const ENV_BROWSERLESS_API_KEY: &str = "MAKERBENCH_BROWSERLESS_API_KEY";
pub const ENV_CLOUDINARY_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
pub const ENV_CLOUDINARY_API_KEY: &str = "CLOUDINARY_API_KEY";
pub const ENV_CLOUDINARY_API_SECRET: &str = "CLOUDINARY_API_SECRET";
pub const ENV_DATABASE_PATH: &str = "MAKERBENCH_DATABASE_PATH";

/// Bootstrap configuration loaded from TOML
///
/// These settings cannot change while the service runs.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file (compiled default when absent)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Interface to bind the HTTP server to
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token for the review endpoints; admin routes are disabled when unset
    #[serde(default)]
    pub admin_token: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Third-party enrichment services (optional)
    #[serde(default)]
    pub services: ServicesConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Metadata scraping, screenshot and image hosting settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    /// Timeout for fetching a submitted page (seconds)
    #[serde(default = "default_metadata_timeout_secs")]
    pub metadata_timeout_secs: u64,

    /// Timeout for a screenshot capture (seconds)
    #[serde(default = "default_screenshot_timeout_secs")]
    pub screenshot_timeout_secs: u64,

    /// Browserless API key; screenshots are skipped when unset
    #[serde(default)]
    pub browserless_api_key: Option<String>,

    /// Browserless endpoint
    #[serde(default = "default_browserless_url")]
    pub browserless_url: String,

    /// Cloudinary credentials; uploads are skipped when unset
    #[serde(default)]
    pub cloudinary: Option<CloudinaryConfig>,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            metadata_timeout_secs: default_metadata_timeout_secs(),
            screenshot_timeout_secs: default_screenshot_timeout_secs(),
            browserless_api_key: None,
            browserless_url: default_browserless_url(),
            cloudinary: None,
        }
    }
}

/// Cloudinary upload credentials
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8888
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metadata_timeout_secs() -> u64 {
    15
}

fn default_screenshot_timeout_secs() -> u64 {
    30
}

fn default_browserless_url() -> String {
    "https://chrome.browserless.io".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            host: default_host(),
            port: default_port(),
            admin_token: None,
            logging: LoggingConfig::default(),
            services: ServicesConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Load configuration from `path`, or from the platform default location
    ///
    /// An explicitly requested file must exist. A missing default file
    /// yields compiled defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_default(path, default_config_path())
    }

    /// [`TomlConfig::load`] with the fallback location supplied by the caller
    pub fn load_with_default(path: Option<&Path>, default_path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
                })?;
                info!("Loaded configuration from {}", path.display());
                Self::from_toml_str(&content)
            }
            None => match default_path {
                Some(path) if path.exists() => {
                    let content = std::fs::read_to_string(&path)?;
                    info!("Loaded configuration from {}", path.display());
                    Self::from_toml_str(&content)
                }
                _ => {
                    warn!("No config file found, using compiled defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Apply environment variable overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` to read variables
    ///
    /// Empty values are treated as unset. Cloudinary credentials only take
    /// effect when all three variables are present.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_DATABASE_PATH) {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(token) = get(ENV_ADMIN_TOKEN) {
            self.admin_token = Some(token);
        }
        if let Some(key) = get(ENV_BROWSERLESS_API_KEY) {
            self.services.browserless_api_key = Some(key);
        }
        if let (Some(cloud_name), Some(api_key), Some(api_secret)) = (
            get(ENV_CLOUDINARY_CLOUD_NAME),
            get(ENV_CLOUDINARY_API_KEY),
            get(ENV_CLOUDINARY_API_SECRET),
        ) {
            self.services.cloudinary = Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            });
        }
    }

    /// Database path from config, or the compiled default
    pub fn resolved_database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(default_database_path)
    }
}

/// Platform default configuration file (`<config dir>/makerbench/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("makerbench").join("config.toml"))
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("makerbench"))
        .unwrap_or_else(|| PathBuf::from("./makerbench_data"))
        .join("makerbench.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8888);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.services.metadata_timeout_secs, 15);
        assert!(config.admin_token.is_none());
        assert!(config.resolved_database_path().ends_with("makerbench.db"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
            port = 9000

            [services]
            browserless_api_key = "bl-key"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.services.browserless_api_key.as_deref(), Some("bl-key"));
        assert_eq!(config.services.screenshot_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("port = \"not a number\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_ADMIN_TOKEN, "admin"),
            (ENV_DATABASE_PATH, "/tmp/mb.db"),
            (ENV_BROWSERLESS_API_KEY, ""),
            (ENV_CLOUDINARY_CLOUD_NAME, "demo"),
            (ENV_CLOUDINARY_API_KEY, "123"),
            (ENV_CLOUDINARY_API_SECRET, "shh"),
        ]
        .into_iter()
        .collect();

        let mut config = TomlConfig::default();
        config.apply_overrides_from(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.admin_token.as_deref(), Some("admin"));
        assert_eq!(config.resolved_database_path(), PathBuf::from("/tmp/mb.db"));
        // Empty value is ignored
        assert!(config.services.browserless_api_key.is_none());
        assert_eq!(
            config.services.cloudinary,
            Some(CloudinaryConfig {
                cloud_name: "demo".to_string(),
                api_key: "123".to_string(),
                api_secret: "shh".to_string(),
            })
        );
    }

    #[test]
    fn test_partial_cloudinary_env_is_ignored() {
        let mut config = TomlConfig::default();
        config.apply_overrides_from(|k| {
            (k == ENV_CLOUDINARY_CLOUD_NAME).then(|| "demo".to_string())
        });
        assert!(config.services.cloudinary.is_none());
    }
}
