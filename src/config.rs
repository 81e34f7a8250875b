//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::ApiConfig;
use crate::client::BackendConfig;
use crate::relay::RelayConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub relay: RelayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Nothing is logged here since this usually runs before the subscriber
    /// exists; call [`LoadedConfig::log_outcome`] once logging is set up.
    pub fn load_default() -> LoadedConfig {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("tally").join("config.toml")),
            Some(PathBuf::from("/etc/tally/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing file of `paths`, falling back to
    /// environment-only config. Files that fail to load are skipped.
    pub fn load_first(paths: &[PathBuf]) -> LoadedConfig {
        let mut failures = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    return LoadedConfig {
                        config,
                        source: Some(path.clone()),
                        failures,
                    }
                }
                Err(e) => failures.push(e),
            }
        }

        LoadedConfig {
            config: Self::from_env(),
            source: None,
            failures,
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `TALLY_*` overrides read through `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Backend base URL
        if let Some(url) = lookup("TALLY_API_URL") {
            self.backend.url = url;
        }

        // API overrides
        if let Some(host) = lookup("TALLY_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("TALLY_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid TALLY_PORT {:?}", port),
            }
        }

        // Relay overrides
        if let Some(url) = lookup("TALLY_RELAY_URL") {
            self.relay.url = url;
        }
        if let Some(to) = lookup("TALLY_RELAY_TO") {
            self.relay.recipient = Some(to);
        }

        // Logging overrides
        if let Some(level) = lookup("TALLY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("TALLY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Result of [`Config::load_default`]
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config came from, `None` for defaults plus environment
    pub source: Option<PathBuf>,
    /// Files that existed but could not be loaded
    pub failures: Vec<ConfigError>,
}

impl LoadedConfig {
    /// Report where the config came from and which files were skipped
    pub fn log_outcome(&self) {
        for failure in &self.failures {
            tracing::warn!("Skipped config file: {}", failure);
        }

        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Tally Configuration
#
# Environment variables override these settings:
# - TALLY_API_URL
# - TALLY_HOST
# - TALLY_PORT
# - TALLY_RELAY_URL
# - TALLY_RELAY_TO
# - TALLY_LOG_LEVEL
# - TALLY_LOG_FORMAT

[backend]
# Dashboard backend base URL
url = "http://localhost:3001/api"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins (empty allows any origin)
cors_origins = []

# Maximum request body size (bytes)
max_body_size = 262144

[relay]
# Contact service receiving issue reports
url = "http://localhost:3001/api/contact"

# Recipient used when a report names none
# recipient = "support@example.org"

# Relay request timeout (ms)
request_timeout_ms = 10000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
