//! Management service client — mTLS REST, lists fabric instances.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::warn;

use crate::error::{FabricError, FabricResult};
use crate::gateway::{normalize_base_url, unexpected_status};
use crate::types::{
    InstanceDetailsResponse, ListInstancesResponse, RemoteSession,
};

/// Client for the fabric management service.
///
/// The management service authenticates callers with a client certificate;
/// its own certificate is self-signed.
#[derive(Debug, Clone)]
pub struct ManagementClient {
    client: reqwest::Client,
    address: String,
}

impl ManagementClient {
    /// Build a client from a base address and PEM cert/key file paths.
    pub fn new(address: impl Into<String>, cert_path: &str, key_path: &str) -> FabricResult<Self> {
        let cert = std::fs::read(cert_path)
            .map_err(|e| FabricError::Identity(format!("read {cert_path}: {e}")))?;
        let key = std::fs::read(key_path)
            .map_err(|e| FabricError::Identity(format!("read {key_path}: {e}")))?;

        let mut pem = cert;
        pem.extend_from_slice(&key);
        let identity = reqwest::Identity::from_pem(&pem)
            .map_err(|e| FabricError::Identity(e.to_string()))?;

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .identity(identity)
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            address: normalize_address(address.into()),
        })
    }

    /// Build a client without a client certificate (plain HTTP test server).
    #[cfg(test)]
    fn without_identity(address: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            address: normalize_address(address.into()),
        }
    }

    /// List the sessions the fabric currently runs.
    ///
    /// The instance index only returns paths; a detail fetch per instance
    /// yields the status and tags. Instances whose detail fetch fails are
    /// skipped so one bad entry cannot hide the rest.
    pub async fn list_running(&self) -> FabricResult<Vec<RemoteSession>> {
        let url = format!("{}/1.0/instances", self.address);

        let response = self.client.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(unexpected_status(response).await);
        }

        let list: ListInstancesResponse = response.json().await?;

        let mut sessions = Vec::with_capacity(list.metadata.len());
        for instance_path in &list.metadata {
            let instance_id = instance_path
                .strip_prefix("/1.0/instances/")
                .unwrap_or(instance_path);
            if instance_id.is_empty() {
                continue;
            }

            match self.instance_details(instance_id).await {
                Ok(details) => sessions.push(RemoteSession {
                    id: details.metadata.id,
                    status: details.metadata.status,
                    url: details.metadata.public_address,
                    joinable: true,
                    stun_servers: vec![],
                    tags: details.metadata.tags,
                }),
                Err(e) => {
                    warn!(instance_id, error = %e, "skipping instance, detail fetch failed");
                }
            }
        }

        Ok(sessions)
    }

    async fn instance_details(&self, instance_id: &str) -> FabricResult<InstanceDetailsResponse> {
        let url = format!("{}/1.0/instances/{}", self.address, instance_id);

        let response = self.client.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(unexpected_status(response).await);
        }

        Ok(response.json().await?)
    }
}

/// Default the scheme to https and strip trailing slashes.
fn normalize_address(address: String) -> String {
    let address = if address.contains("://") {
        address
    } else {
        format!("https://{address}")
    };
    normalize_base_url(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn address_gets_https_scheme() {
        let client = ManagementClient::without_identity("mgmt.example.com:8444/");
        assert_eq!(client.address, "https://mgmt.example.com:8444");

        let client = ManagementClient::without_identity("http://127.0.0.1:9000");
        assert_eq!(client.address, "http://127.0.0.1:9000");
    }

    #[tokio::test]
    async fn list_running_resolves_details() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1.0/instances"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_size": 2,
                "metadata": ["/1.0/instances/inst-1", "/1.0/instances/inst-2"]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1.0/instances/inst-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "metadata": {
                    "id": "inst-1",
                    "status": "running",
                    "tags": ["session=s-1"]
                }
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1.0/instances/inst-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "metadata": {
                    "id": "inst-2",
                    "status": "stopped",
                    "tags": []
                }
            })))
            .mount(&server)
            .await;

        let client = ManagementClient::without_identity(server.uri());
        let sessions = client.list_running().await.unwrap();

        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, "inst-1");
        assert_eq!(sessions[0].session_id(), "s-1");
        assert_eq!(sessions[0].status, "running");
        assert_eq!(sessions[1].status, "stopped");
    }

    #[tokio::test]
    async fn list_running_skips_failing_instances() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1.0/instances"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "metadata": ["/1.0/instances/inst-ok", "/1.0/instances/inst-broken"]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1.0/instances/inst-ok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "metadata": { "id": "inst-ok", "status": "running" }
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/1.0/instances/inst-broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ManagementClient::without_identity(server.uri());
        let sessions = client.list_running().await.unwrap();

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, "inst-ok");
    }

    #[tokio::test]
    async fn list_running_propagates_index_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1.0/instances"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ManagementClient::without_identity(server.uri());
        assert!(client.list_running().await.is_err());
    }
}
