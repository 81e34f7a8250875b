//! Upstream contact relay client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::api::dto::RelayPayload;

/// Something that can deliver an issue report
#[async_trait]
pub trait Relay: Send + Sync {
    /// Forward `payload` once and return the upstream's JSON answer
    async fn forward(&self, payload: &RelayPayload) -> Result<serde_json::Value, RelayError>;

    /// Whether the upstream currently answers at all
    async fn is_reachable(&self) -> bool {
        true
    }
}

/// Configuration for [`ContactRelay`]
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Endpoint that accepts [`RelayPayload`] as JSON
    #[serde(default = "default_relay_url")]
    pub url: String,

    /// Recipient used when a report does not name one
    #[serde(default)]
    pub recipient: Option<String>,

    #[serde(default = "default_relay_timeout")]
    pub request_timeout_ms: u64,
}

fn default_relay_url() -> String {
    "http://localhost:3001/api/contact".to_string()
}

fn default_relay_timeout() -> u64 {
    10_000
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: default_relay_url(),
            recipient: None,
            request_timeout_ms: default_relay_timeout(),
        }
    }
}

/// HTTP relay posting payloads to the contact service
pub struct ContactRelay {
    client: Client,
    config: RelayConfig,
}

impl ContactRelay {
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(RelayError::Request)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

#[async_trait]
impl Relay for ContactRelay {
    async fn forward(&self, payload: &RelayPayload) -> Result<serde_json::Value, RelayError> {
        let response = self
            .client
            .post(&self.config.url)
            .json(payload)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        // Some relays answer 2xx with an empty body
        let body = response.bytes().await.map_err(classify)?;
        if body.is_empty() {
            return Ok(serde_json::json!({ "success": true }));
        }

        serde_json::from_slice(&body).map_err(RelayError::Decode)
    }

    async fn is_reachable(&self) -> bool {
        // Any HTTP answer counts; only transport failures mean unreachable
        self.client.head(&self.config.url).send().await.is_ok()
    }
}

fn classify(e: reqwest::Error) -> RelayError {
    if e.is_timeout() {
        RelayError::Timeout
    } else if e.is_connect() {
        RelayError::Unavailable
    } else {
        RelayError::Request(e)
    }
}

/// Errors that can occur when forwarding to the relay
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Relay unavailable")]
    Unavailable,

    #[error("Relay request timeout")]
    Timeout,

    #[error("Relay request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Relay returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Relay returned malformed JSON: {0}")]
    Decode(#[source] serde_json::Error),
}
