//! The fleet supervisor: owns one game instance per configured title.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};

use playgrid_core::GameConfig;
use playgrid_fabric::Fabric;
use playgrid_pool::SessionPool;

use crate::error::{FleetError, FleetResult};
use crate::instance::{GameInstance, GameInstanceStatus};

/// Constructs, initialises, starts, and stops all game instances.
pub struct FleetSupervisor {
    instances: RwLock<HashMap<String, GameInstance>>,
    initialized: AtomicBool,
}

impl FleetSupervisor {
    pub fn new(games: Vec<GameConfig>, fabric: Arc<dyn Fabric>) -> Self {
        let instances = games
            .into_iter()
            .map(|config| {
                let name = config.name.clone();
                (name, GameInstance::new(config, Arc::clone(&fabric)))
            })
            .collect();

        Self {
            instances: RwLock::new(instances),
            initialized: AtomicBool::new(false),
        }
    }

    /// Initialise every instance. The first failure aborts and leaves the
    /// supervisor un-initialised.
    pub async fn init(&self) -> FleetResult<()> {
        let mut instances = self.instances.write().await;
        for instance in instances.values_mut() {
            instance.init().await?;
        }

        self.initialized.store(true, Ordering::SeqCst);
        info!(games = instances.len(), "fleet initialized");
        Ok(())
    }

    /// Start every instance, all-or-nothing: on the first failure, the
    /// instances started so far are stopped before the error returns.
    pub async fn start(&self) -> FleetResult<()> {
        if !self.initialized.load(Ordering::SeqCst) {
            return Err(FleetError::SupervisorNotInitialized);
        }

        let mut instances = self.instances.write().await;
        let names: Vec<String> = instances.keys().cloned().collect();
        let mut started: Vec<String> = Vec::new();

        for name in &names {
            let Some(instance) = instances.get_mut(name) else {
                continue;
            };
            match instance.start().await {
                Ok(()) => started.push(name.clone()),
                Err(e) => {
                    error!(game = %name, error = %e, "failed to start game instance, rolling back");
                    for prev in &started {
                        if let Some(prev_instance) = instances.get_mut(prev) {
                            if let Err(stop_err) = prev_instance.stop().await {
                                error!(
                                    game = %prev,
                                    error = %stop_err,
                                    "failed to stop game instance during rollback"
                                );
                            }
                        }
                    }
                    return Err(e);
                }
            }
        }

        info!(games = started.len(), "fleet started");
        Ok(())
    }

    /// Stop every instance, continuing through per-instance errors. The
    /// first error (if any) is returned once all instances were attempted.
    pub async fn stop(&self) -> FleetResult<()> {
        let mut instances = self.instances.write().await;
        let mut first_error = None;

        for (name, instance) in instances.iter_mut() {
            if let Err(e) = instance.stop().await {
                error!(game = %name, error = %e, "failed to stop game instance");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        info!("fleet stopped");
        match first_error {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    /// The session pool for a game, if configured.
    pub async fn pool(&self, game: &str) -> Option<Arc<SessionPool>> {
        let instances = self.instances.read().await;
        instances.get(game).map(|instance| instance.pool())
    }

    /// Status report for one game.
    pub async fn status(&self, game: &str) -> Option<GameInstanceStatus> {
        let instances = self.instances.read().await;
        match instances.get(game) {
            Some(instance) => Some(instance.status().await),
            None => None,
        }
    }

    /// All configured game names.
    pub async fn games(&self) -> Vec<String> {
        let instances = self.instances.read().await;
        let mut names: Vec<String> = instances.keys().cloned().collect();
        names.sort();
        names
    }
}
