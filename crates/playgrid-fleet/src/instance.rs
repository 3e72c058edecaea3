//! One game bound to one session pool.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use playgrid_core::{parse_duration, GameConfig};
use playgrid_fabric::Fabric;
use playgrid_pool::{PoolConfig, PoolStatus, SessionPool};

use crate::error::{FleetError, FleetResult};

const DEFAULT_HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(5 * 60);
const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Binds one game config to one session pool and owns its lifecycle flags.
pub struct GameInstance {
    config: GameConfig,
    pool: Arc<SessionPool>,
    initialized: bool,
    running: bool,
}

/// Status report for one game instance.
#[derive(Debug, Clone, Serialize)]
pub struct GameInstanceStatus {
    pub name: String,
    pub initialized: bool,
    pub running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_status: Option<PoolStatus>,
}

impl GameInstance {
    pub fn new(config: GameConfig, fabric: Arc<dyn Fabric>) -> Self {
        Self {
            config,
            pool: Arc::new(SessionPool::new(fabric)),
            initialized: false,
            running: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The session pool backing this game.
    pub fn pool(&self) -> Arc<SessionPool> {
        Arc::clone(&self.pool)
    }

    /// Translate the game config into a pool config and initialise the pool.
    pub async fn init(&mut self) -> FleetResult<()> {
        let name = self.config.name.clone();
        if self.initialized {
            return Err(FleetError::AlreadyInitialized(name));
        }

        let session = self
            .config
            .session_config
            .as_ref()
            .ok_or_else(|| FleetError::MissingSessionConfig(name.clone()))?;

        let session_ttl = parse_duration(&self.config.runtime.time_over).ok_or_else(|| {
            FleetError::InvalidDuration {
                game: name.clone(),
                field: "runtime.time_over",
                value: self.config.runtime.time_over.clone(),
            }
        })?;

        let heartbeat_timeout = parse_optional_duration(
            &name,
            "session_config.heartbeat_timeout",
            session.heartbeat_timeout.as_deref(),
            DEFAULT_HEARTBEAT_TIMEOUT,
        )?;
        let sync_interval = parse_optional_duration(
            &name,
            "session_config.sync_interval",
            session.sync_interval.as_deref(),
            DEFAULT_SYNC_INTERVAL,
        )?;

        let pool_config = PoolConfig {
            game_name: name.clone(),
            min: session.min,
            max: session.max,
            session_ttl,
            heartbeat_timeout,
            sync_interval,
            screen: session.screen.clone(),
        };

        self.pool.init(pool_config).await?;
        self.initialized = true;
        info!(game = %name, "game instance initialized");
        Ok(())
    }

    pub async fn start(&mut self) -> FleetResult<()> {
        let name = self.config.name.clone();
        if !self.initialized {
            return Err(FleetError::NotInitialized(name));
        }
        if self.running {
            return Err(FleetError::AlreadyRunning(name));
        }

        self.pool.start().await?;
        self.running = true;
        info!(game = %name, "game instance started");
        Ok(())
    }

    /// Stop the pool. A no-op when not running.
    pub async fn stop(&mut self) -> FleetResult<()> {
        if !self.running {
            return Ok(());
        }

        self.pool.stop().await?;
        self.running = false;
        info!(game = %self.config.name, "game instance stopped");
        Ok(())
    }

    pub async fn status(&self) -> GameInstanceStatus {
        let pool_status = if self.initialized {
            Some(self.pool.pool_status().await)
        } else {
            None
        };

        GameInstanceStatus {
            name: self.config.name.clone(),
            initialized: self.initialized,
            running: self.running,
            pool_status,
        }
    }
}

fn parse_optional_duration(
    game: &str,
    field: &'static str,
    value: Option<&str>,
    default: Duration,
) -> FleetResult<Duration> {
    match value {
        None => Ok(default),
        Some(raw) => parse_duration(raw).ok_or_else(|| FleetError::InvalidDuration {
            game: game.to_string(),
            field,
            value: raw.to_string(),
        }),
    }
}
