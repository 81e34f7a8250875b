//! Issue-report submission

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::backend::decode;
use super::error::{ClientError, ClientResult};
use crate::api::dto::IssueReport;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for `POST /api/report-issue` on a Tally server
#[derive(Debug, Clone)]
pub struct ReportClient {
    client: Client,
    endpoint: String,
}

impl ReportClient {
    /// `server_url` is the server root, e.g. `http://localhost:8090`
    pub fn new(server_url: &str) -> ClientResult<Self> {
        let client = Client::builder().build().map_err(ClientError::Build)?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/report-issue", server_url.trim_end_matches('/')),
        })
    }

    /// Submit a report once. Validation failures come back as
    /// [`ClientError::Rejected`] with the server's message.
    pub async fn submit(&self, report: &IssueReport) -> ClientResult<serde_json::Value> {
        let resource = "issue report";

        let response = self
            .client
            .post(&self.endpoint)
            .json(report)
            .send()
            .await
            .map_err(|source| ClientError::Transport { resource, source })?;

        if response.status() == StatusCode::BAD_REQUEST {
            return match response.json::<ErrorBody>().await {
                Ok(body) => Err(ClientError::Rejected(body.error)),
                Err(_) => Err(ClientError::Status {
                    resource,
                    status: StatusCode::BAD_REQUEST.as_u16(),
                }),
            };
        }

        decode(response, resource).await
    }
}
