//! The `Fabric` capability trait and its real-fabric implementation.

use async_trait::async_trait;

use crate::error::FabricResult;
use crate::gateway::GatewayClient;
use crate::management::ManagementClient;
use crate::types::{CreateSessionRequest, RemoteSession};

/// Capability surface over the remote streaming fabric.
///
/// Implementations must be safe to share across pools; the pool manager
/// holds one behind an `Arc` and calls it from background tasks.
#[async_trait]
pub trait Fabric: Send + Sync {
    /// Request instantiation of a new session.
    ///
    /// Success means the request was accepted, not that the session is
    /// running — newcomers surface through the next `list_running`.
    async fn create_async(&self, req: CreateSessionRequest) -> FabricResult<()>;

    /// Request teardown of a session. Idempotent: tearing down a session
    /// the fabric no longer knows about succeeds.
    async fn delete(&self, remote_id: &str) -> FabricResult<()>;

    /// All sessions the fabric currently considers live, with their
    /// status strings and tags.
    async fn list_running(&self) -> FabricResult<Vec<RemoteSession>>;

    /// The gateway URL streaming clients should connect to.
    fn gateway_url(&self) -> &str;

    /// The token streaming clients authenticate with.
    fn auth_token(&self) -> &str;
}

/// Real-fabric client: gateway for create/delete, management service for
/// listing.
pub struct FabricClient {
    gateway: GatewayClient,
    management: ManagementClient,
}

impl FabricClient {
    pub fn new(gateway: GatewayClient, management: ManagementClient) -> Self {
        Self {
            gateway,
            management,
        }
    }
}

#[async_trait]
impl Fabric for FabricClient {
    async fn create_async(&self, req: CreateSessionRequest) -> FabricResult<()> {
        self.gateway.create_async(req).await
    }

    async fn delete(&self, remote_id: &str) -> FabricResult<()> {
        self.gateway.delete(remote_id).await
    }

    async fn list_running(&self) -> FabricResult<Vec<RemoteSession>> {
        self.management.list_running().await
    }

    fn gateway_url(&self) -> &str {
        self.gateway.gateway_url()
    }

    fn auth_token(&self) -> &str {
        self.gateway.auth_token()
    }
}
