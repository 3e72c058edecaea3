//! The session pool manager and its background reconciler.
//!
//! All table state lives behind a single `RwLock`; mutators take it
//! exclusively, read-only operations take it shared, and it is never held
//! across a fabric call. Teardown requests run on detached tasks so a
//! cancelled caller cannot leak a remote session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use playgrid_core::ScreenConfig;
use playgrid_fabric::{CreateSessionRequest, Fabric, RemoteSession, Screen};

use crate::error::{PoolError, PoolResult};
use crate::session::{PoolStatus, Session, SessionStatus};

/// Configuration for one game's session pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub game_name: String,
    /// Target floor; the reconciler tops the pool up to this.
    pub min: usize,
    /// Hard ceiling; the reconciler never requests creation beyond this.
    pub max: usize,
    /// Age after which a session is reclaimed regardless of status.
    pub session_ttl: Duration,
    /// Silence after which a warmed or in-use session is reclaimed.
    pub heartbeat_timeout: Duration,
    /// Reconciler tick period.
    pub sync_interval: Duration,
    /// Display parameters forwarded in create requests.
    pub screen: ScreenConfig,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            game_name: String::new(),
            min: 1,
            max: 10,
            session_ttl: Duration::from_secs(5 * 60),
            heartbeat_timeout: Duration::from_secs(5 * 60),
            sync_interval: Duration::from_secs(30),
            screen: ScreenConfig::default(),
        }
    }
}

type SessionMap = Arc<RwLock<HashMap<String, Session>>>;

/// Handle to the running reconciler task.
struct RunnerSlot {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

/// Warm session pool for a single game title.
pub struct SessionPool {
    fabric: Arc<dyn Fabric>,
    cfg: RwLock<Option<PoolConfig>>,
    sessions: SessionMap,
    runner: Mutex<Option<RunnerSlot>>,
}

impl SessionPool {
    pub fn new(fabric: Arc<dyn Fabric>) -> Self {
        Self {
            fabric,
            cfg: RwLock::new(None),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            runner: Mutex::new(None),
        }
    }

    /// Store the pool configuration. Idempotent; a later call replaces the
    /// stored config for subsequent operations.
    pub async fn init(&self, cfg: PoolConfig) -> PoolResult<()> {
        *self.cfg.write().await = Some(cfg);
        Ok(())
    }

    /// Spawn the reconciler. The first pass runs immediately: it adopts
    /// whatever the fabric already runs and starts filling toward `min`.
    pub async fn start(&self) -> PoolResult<()> {
        let cfg = self
            .cfg
            .read()
            .await
            .clone()
            .ok_or(PoolError::NotInitialized)?;

        let mut runner = self.runner.lock().await;
        if runner.is_some() {
            return Err(PoolError::AlreadyStarted);
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let fabric = Arc::clone(&self.fabric);
        let sessions = Arc::clone(&self.sessions);
        let game = cfg.game_name.clone();

        let handle = tokio::spawn(async move {
            run_reconciler(cfg, fabric, sessions, shutdown_rx).await;
        });

        *runner = Some(RunnerSlot {
            handle,
            shutdown_tx,
        });
        info!(game = %game, "session pool started");
        Ok(())
    }

    /// Signal the reconciler to exit and wait until it has. Idempotent.
    pub async fn stop(&self) -> PoolResult<()> {
        let mut runner = self.runner.lock().await;
        if let Some(slot) = runner.take() {
            let _ = slot.shutdown_tx.send(true);
            let _ = slot.handle.await;
            info!("session pool stopped");
        }
        Ok(())
    }

    /// Claim a cold session and begin warming it.
    pub async fn acquire_cold(&self) -> PoolResult<Session> {
        let mut table = self.sessions.write().await;
        let session = table
            .values_mut()
            .filter(|s| s.status == SessionStatus::Cold)
            .min_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .ok_or(PoolError::NoColdAvailable)?;

        session.status = SessionStatus::Warming;
        session.last_heartbeat = epoch_secs();
        Ok(session.clone())
    }

    /// Mark a warming session as ready for hand-off.
    pub async fn set_warmed(&self, id: &str) -> PoolResult<()> {
        let mut table = self.sessions.write().await;
        let session = table
            .get_mut(id)
            .ok_or_else(|| PoolError::NotFound(id.to_string()))?;

        if session.status != SessionStatus::Warming {
            return Err(PoolError::WrongState {
                id: id.to_string(),
                expected: SessionStatus::Warming,
                actual: session.status,
            });
        }

        session.status = SessionStatus::Warmed;
        session.last_heartbeat = epoch_secs();
        Ok(())
    }

    /// Claim a warmed session for a live user and start its business TTL.
    pub async fn acquire_warmed(&self) -> PoolResult<Session> {
        let ttl = self
            .cfg
            .read()
            .await
            .as_ref()
            .ok_or(PoolError::NotInitialized)?
            .session_ttl;

        let now = epoch_secs();
        let mut table = self.sessions.write().await;
        let session = table
            .values_mut()
            .filter(|s| s.status == SessionStatus::Warmed)
            .min_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .ok_or(PoolError::NoWarmedAvailable)?;

        session.status = SessionStatus::InUse;
        session.expires_at = now + ttl.as_secs();
        session.last_heartbeat = now;
        Ok(session.clone())
    }

    /// Record that the client holding `id` is still alive.
    pub async fn heartbeat(&self, id: &str) -> PoolResult<()> {
        let mut table = self.sessions.write().await;
        let session = table
            .get_mut(id)
            .ok_or_else(|| PoolError::NotFound(id.to_string()))?;
        session.last_heartbeat = epoch_secs();
        Ok(())
    }

    /// Remove a session from the table and request remote teardown.
    ///
    /// The local removal commits first; the delete is best effort and runs
    /// detached so the caller going away cannot cancel it.
    pub async fn release(&self, id: &str) -> PoolResult<()> {
        let session = self
            .sessions
            .write()
            .await
            .remove(id)
            .ok_or_else(|| PoolError::NotFound(id.to_string()))?;

        if let Some(remote) = session.remote {
            let fabric = Arc::clone(&self.fabric);
            let teardown = tokio::spawn(async move {
                if let Err(e) = fabric.delete(&remote.id).await {
                    error!(remote_id = %remote.id, error = %e, "failed to delete released session");
                }
            });
            let _ = teardown.await;
        }

        info!(session_id = %id, "session released");
        Ok(())
    }

    /// Look up a session by id.
    pub async fn get(&self, id: &str) -> PoolResult<Session> {
        let table = self.sessions.read().await;
        table
            .get(id)
            .cloned()
            .ok_or_else(|| PoolError::NotFound(id.to_string()))
    }

    /// Snapshot of all sessions, ordered by status then creation time.
    pub async fn list(&self) -> Vec<Session> {
        let table = self.sessions.read().await;
        let mut sessions: Vec<Session> = table.values().cloned().collect();
        sessions.sort_by(|a, b| {
            a.status
                .cmp(&b.status)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });
        sessions
    }

    /// Counts by status.
    pub async fn pool_status(&self) -> PoolStatus {
        let table = self.sessions.read().await;
        let mut status = PoolStatus {
            total: table.len(),
            ..PoolStatus::default()
        };
        for session in table.values() {
            match session.status {
                SessionStatus::Cold => status.cold += 1,
                SessionStatus::Warming => status.warming += 1,
                SessionStatus::Warmed => status.warmed += 1,
                SessionStatus::InUse => status.in_use += 1,
            }
        }
        status
    }
}

// ── Reconciler ─────────────────────────────────────────────────────

async fn run_reconciler(
    cfg: PoolConfig,
    fabric: Arc<dyn Fabric>,
    sessions: SessionMap,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(
        game = %cfg.game_name,
        interval_secs = cfg.sync_interval.as_secs(),
        "reconciler started"
    );

    // Initial pass: adopt what already runs, then fill toward the floor.
    reconcile(&cfg, &fabric, &sessions).await;

    loop {
        tokio::select! {
            _ = tokio::time::sleep(cfg.sync_interval) => {
                reconcile(&cfg, &fabric, &sessions).await;
            }
            _ = shutdown.changed() => {
                info!(game = %cfg.game_name, "reconciler shutting down");
                break;
            }
        }
    }
}

/// One reconciler tick: remote sync, expiry sweep, top-up.
///
/// A listing failure skips the sync but never the sweep or the top-up.
async fn reconcile(cfg: &PoolConfig, fabric: &Arc<dyn Fabric>, sessions: &SessionMap) {
    match fabric.list_running().await {
        Ok(remote) => sync_remote(cfg, fabric, sessions, remote).await,
        Err(e) => {
            warn!(game = %cfg.game_name, error = %e, "failed to list remote sessions");
        }
    }

    sweep_expired(cfg, fabric, sessions).await;
    top_up(cfg, fabric, sessions).await;
}

/// Reshape the table against the remote list: adopt newcomers as cold,
/// drop entries the fabric no longer runs.
async fn sync_remote(
    cfg: &PoolConfig,
    fabric: &Arc<dyn Fabric>,
    sessions: &SessionMap,
    remote: Vec<RemoteSession>,
) {
    let running: HashMap<String, RemoteSession> = remote
        .into_iter()
        .filter(|r| r.status == "running")
        .map(|r| (r.session_id().to_string(), r))
        .collect();

    let gateway_url = fabric.gateway_url().to_string();
    let auth_token = fabric.auth_token().to_string();
    let now = epoch_secs();

    let mut table = sessions.write().await;

    for (id, remote) in &running {
        if !table.contains_key(id) {
            debug!(
                game = %cfg.game_name,
                session_id = %id,
                remote_id = %remote.id,
                "adopting remote session"
            );
            table.insert(
                id.clone(),
                Session {
                    id: id.clone(),
                    game: cfg.game_name.clone(),
                    status: SessionStatus::Cold,
                    remote: Some(remote.clone()),
                    gateway_url: gateway_url.clone(),
                    auth_token: auth_token.clone(),
                    expires_at: now + cfg.session_ttl.as_secs(),
                    last_heartbeat: now,
                    created_at: now,
                },
            );
        }
    }

    // The remote list is authoritative: entries it no longer carries are
    // already gone, so no delete is issued for them.
    table.retain(|id, _| running.contains_key(id));
}

/// Remove sessions past their TTL, and warmed/in-use sessions whose client
/// has gone silent. Evicted remote sessions are deleted on detached tasks.
async fn sweep_expired(cfg: &PoolConfig, fabric: &Arc<dyn Fabric>, sessions: &SessionMap) {
    let now = epoch_secs();
    let ttl = cfg.session_ttl.as_secs();
    let heartbeat_timeout = cfg.heartbeat_timeout.as_secs();

    let mut evicted = Vec::new();
    {
        let mut table = sessions.write().await;
        let expired: Vec<String> = table
            .values()
            .filter(|s| {
                now.saturating_sub(s.created_at) > ttl
                    || (matches!(s.status, SessionStatus::Warmed | SessionStatus::InUse)
                        && now.saturating_sub(s.last_heartbeat) > heartbeat_timeout)
            })
            .map(|s| s.id.clone())
            .collect();

        for id in expired {
            if let Some(session) = table.remove(&id) {
                warn!(
                    game = %cfg.game_name,
                    session_id = %id,
                    status = %session.status,
                    "session expired, reclaiming"
                );
                evicted.push(session);
            }
        }
    }

    for session in evicted {
        if let Some(remote) = session.remote {
            let fabric = Arc::clone(fabric);
            tokio::spawn(async move {
                if let Err(e) = fabric.delete(&remote.id).await {
                    error!(remote_id = %remote.id, error = %e, "failed to delete expired session");
                }
            });
        }
    }
}

/// Request at most one new session per tick while below the floor.
async fn top_up(cfg: &PoolConfig, fabric: &Arc<dyn Fabric>, sessions: &SessionMap) {
    let total = sessions.read().await.len();

    if total >= cfg.min {
        return;
    }
    if total >= cfg.max {
        warn!(
            game = %cfg.game_name,
            max = cfg.max,
            "pool at maximum capacity, cannot create more sessions"
        );
        return;
    }

    // One request per tick; a batch would come up together and expire
    // together session_ttl later.
    let req = CreateSessionRequest {
        app: cfg.game_name.clone(),
        joinable: true,
        screen: Screen {
            width: cfg.screen.width,
            height: cfg.screen.height,
            density: cfg.screen.density,
            fps: cfg.screen.fps,
        },
        ..CreateSessionRequest::default()
    };

    let fabric = Arc::clone(fabric);
    let game = cfg.game_name.clone();
    tokio::spawn(async move {
        match fabric.create_async(req).await {
            // The newcomer surfaces through the next reconcile tick.
            Ok(()) => info!(game = %game, "requested new session"),
            Err(e) => error!(game = %game, error = %e, "failed to request new session"),
        }
    });
}

/// Current Unix epoch in seconds.
fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
