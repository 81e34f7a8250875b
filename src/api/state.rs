//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use crate::relay::Relay;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Upstream contact relay
    pub relay: Arc<dyn Relay>,
    /// Recipient used when a report names none
    pub default_recipient: Option<String>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(relay: Arc<dyn Relay>, config: ApiConfig) -> Self {
        Self {
            relay,
            default_recipient: None,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Builder: set the fallback report recipient
    pub fn with_recipient(mut self, recipient: Option<String>) -> Self {
        self.default_recipient = recipient;
        self
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins; empty means permissive
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_max_body_size() -> usize {
    256 * 1024 // 256 KB
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            max_body_size: default_max_body_size(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
