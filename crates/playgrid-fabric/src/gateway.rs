//! Streaming gateway client — token-authenticated session create/delete.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

use crate::error::{FabricError, FabricResult};
use crate::types::CreateSessionRequest;

/// Client for the streaming gateway REST API.
///
/// The gateway authenticates with an `api_token` query parameter and
/// typically serves a self-signed certificate.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    address: String,
    token: String,
}

impl GatewayClient {
    pub fn new(address: impl Into<String>, token: impl Into<String>) -> FabricResult<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            address: normalize_base_url(address.into()),
            token: token.into(),
        })
    }

    /// The gateway base URL, as handed to streaming clients.
    pub fn gateway_url(&self) -> &str {
        &self.address
    }

    /// The API token, as handed to streaming clients.
    pub fn auth_token(&self) -> &str {
        &self.token
    }

    /// Request a new streaming session. The gateway answers `201 Created`
    /// once the request is accepted; the session itself comes up later.
    pub async fn create_async(&self, req: CreateSessionRequest) -> FabricResult<()> {
        let url = format!("{}/1.0/sessions?api_token={}", self.address, self.token);

        let response = self.client.post(&url).json(&req).send().await?;

        if response.status() != StatusCode::CREATED {
            return Err(unexpected_status(response).await);
        }

        debug!(app = %req.app, "session creation requested");
        Ok(())
    }

    /// Request teardown of a session. `200`, `202` and `404` all count as
    /// success — a session the gateway no longer knows about is gone.
    pub async fn delete(&self, session_id: &str) -> FabricResult<()> {
        let url = format!(
            "{}/1.0/sessions/{}?api_token={}",
            self.address, session_id, self.token
        );

        let response = self.client.delete(&url).send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::ACCEPTED | StatusCode::NOT_FOUND => {
                debug!(session_id, "session deletion requested");
                Ok(())
            }
            _ => Err(unexpected_status(response).await),
        }
    }
}

/// Strip a trailing slash so path concatenation stays predictable.
pub(crate) fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

pub(crate) async fn unexpected_status(response: reqwest::Response) -> FabricError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    FabricError::UnexpectedStatus { status, body }
}
