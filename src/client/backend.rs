//! Dashboard backend client

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::{ClientError, ClientResult};
use super::types::{DashboardStats, DashboardSummary, Order};

/// Backend address used when none is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Configuration for [`BackendClient`]
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL every resource path is appended to
    #[serde(default = "default_api_url")]
    pub url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_user_agent() -> String {
    format!("tally/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl BackendConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// REST client for the dashboard backend.
///
/// The base URL is fixed at construction.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent)
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /dashboard/stats
    pub async fn dashboard_stats(&self) -> ClientResult<DashboardStats> {
        let url = format!("{}/dashboard/stats", self.base_url);
        self.get_json(&url, "dashboard stats").await
    }

    /// GET /orders/recent
    pub async fn recent_orders(&self) -> ClientResult<Vec<Order>> {
        let url = format!("{}/orders/recent", self.base_url);
        self.get_json(&url, "recent orders").await
    }

    /// GET /dashboard-summary?month=&year=
    ///
    /// `month` and `year` are forwarded as given; the backend validates them.
    pub async fn dashboard_summary(
        &self,
        month: impl std::fmt::Display,
        year: impl std::fmt::Display,
    ) -> ClientResult<DashboardSummary> {
        let url = format!(
            "{}/dashboard-summary?month={}&year={}",
            self.base_url,
            urlencoding::encode(&month.to_string()),
            urlencoding::encode(&year.to_string()),
        );
        self.get_json(&url, "dashboard summary").await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        resource: &'static str,
    ) -> ClientResult<T> {
        tracing::debug!(%url, "Fetching {}", resource);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ClientError::Transport { resource, source })?;

        decode(response, resource).await
    }
}

/// Decode a 2xx JSON body; any other status fails without reading the body.
pub(super) async fn decode<T: DeserializeOwned>(
    response: Response,
    resource: &'static str,
) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "Failed to fetch {}", resource);
        return Err(ClientError::Status {
            resource,
            status: status.as_u16(),
        });
    }

    response
        .json()
        .await
        .map_err(|source| ClientError::Decode { resource, source })
}
