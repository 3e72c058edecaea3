//! Wire types for the remote streaming fabric.

use serde::{Deserialize, Serialize};

/// Display configuration for a streaming session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
    pub density: u32,
    pub fps: u32,
}

/// Request body for session creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub app: String,
    pub app_version: u32,
    pub ephemeral: bool,
    pub extra_data: String,
    pub idle_time_min: u32,
    pub joinable: bool,
    pub screen: Screen,
}

/// A STUN/TURN server handed to streaming clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StunServer {
    pub urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// The remote fabric's view of one session.
///
/// `id` is the fabric's own identifier. The client-meaningful id may differ:
/// it is carried in a `session=<id>` tag when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSession {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub joinable: bool,
    #[serde(default)]
    pub stun_servers: Vec<StunServer>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RemoteSession {
    /// The client-meaningful session id: the `session=<id>` tag value when
    /// present, otherwise the remote id.
    pub fn session_id(&self) -> &str {
        session_tag(&self.tags).unwrap_or(&self.id)
    }
}

/// Extract the value of a `session=<id>` tag.
pub fn session_tag(tags: &[String]) -> Option<&str> {
    tags.iter().find_map(|tag| tag.strip_prefix("session="))
}

// ── Management service wire format ─────────────────────────────────

/// Response to `GET /1.0/instances` — a list of instance paths.
#[derive(Debug, Clone, Deserialize)]
pub struct ListInstancesResponse {
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub status_code: u32,
    #[serde(default)]
    pub metadata: Vec<String>,
}

/// Response to `GET /1.0/instances/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceDetailsResponse {
    #[serde(default)]
    pub status_code: u32,
    pub metadata: InstanceDetails,
}

/// Detailed information about one fabric instance.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstanceDetails {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub public_address: String,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub tags: Vec<String>,
}
