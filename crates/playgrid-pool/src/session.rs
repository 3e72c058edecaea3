//! Session model: lifecycle status, the table entry, and pool aggregates.

use serde::{Deserialize, Serialize};

use playgrid_fabric::RemoteSession;

/// Lifecycle status of a pooled session.
///
/// The variant order is the canonical listing order; removal from the
/// table is the terminal state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Cold,
    Warming,
    Warmed,
    InUse,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::Cold => "cold",
            SessionStatus::Warming => "warming",
            SessionStatus::Warmed => "warmed",
            SessionStatus::InUse => "in_use",
        };
        f.write_str(s)
    }
}

/// One entry in a pool's session table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Stable local identifier; equals the remote session id unless the
    /// remote entry carried a `session=<id>` tag.
    pub id: String,
    /// The game title this session belongs to.
    pub game: String,
    pub status: SessionStatus,
    /// The remote fabric's view, absent until the reconciler has observed
    /// the session remotely.
    pub remote: Option<RemoteSession>,
    /// Connection parameters snapshotted when the entry was created.
    pub gateway_url: String,
    pub auth_token: String,
    /// Business TTL deadline; meaningful only while `in_use`.
    pub expires_at: u64,
    pub last_heartbeat: u64,
    pub created_at: u64,
}

/// Counts by status for one pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    pub total: usize,
    pub cold: usize,
    pub warming: usize,
    pub warmed: usize,
    pub in_use: usize,
}
