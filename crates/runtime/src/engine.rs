//! Combat engine orchestrator.
//!
//! The engine owns the reward worker, wires the shared store, clock and event
//! bus into the lifecycle manager and the action resolver, and exposes a
//! builder-based API for embedding applications.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::{CombatError, CombatService, Result};
use crate::auth::AuthProvider;
use crate::character::{CharacterStatsClient, HttpCharacterClient};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::events::{DuelEvent, EventBus};
use crate::lifecycle::DuelLifecycleManager;
use crate::repository::{DuelStore, FileDuelStore, InMemoryDuelStore};
use crate::resolver::ActionResolver;
use crate::termination::TerminationHandler;
use crate::workers::{RewardDispatcher, RewardJob, RewardWorker};

/// Running combat engine.
///
/// [`DuelLifecycleManager`] and [`ActionResolver`] are cloneable façades that
/// can be handed to request handlers.
pub struct CombatEngine {
    lifecycle: DuelLifecycleManager,
    resolver: ActionResolver,
    store: Arc<dyn DuelStore>,
    events: EventBus,

    // Background workers
    shutdown_tx: oneshot::Sender<()>,
    reward_worker_handle: JoinHandle<()>,
}

impl CombatEngine {
    /// Create a new engine builder
    pub fn builder() -> CombatEngineBuilder {
        CombatEngineBuilder::new()
    }

    pub fn lifecycle(&self) -> &DuelLifecycleManager {
        &self.lifecycle
    }

    pub fn resolver(&self) -> &ActionResolver {
        &self.resolver
    }

    pub fn store(&self) -> Arc<dyn DuelStore> {
        Arc::clone(&self.store)
    }

    /// Request-level façade authenticating callers through `auth`.
    pub fn service(&self, auth: Arc<dyn AuthProvider>) -> CombatService {
        CombatService::new(auth, self.lifecycle.clone(), self.resolver.clone())
    }

    /// Subscribe to duel events
    pub fn subscribe(&self) -> broadcast::Receiver<DuelEvent> {
        self.events.subscribe()
    }

    /// Stops the reward worker once every queued reward has been handed over.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(());

        self.reward_worker_handle
            .await
            .map_err(CombatError::WorkerJoin)?;

        info!(target: "duel::engine", "combat engine stopped");
        Ok(())
    }
}

/// Builder for [`CombatEngine`].
///
/// Anything not injected is derived from [`EngineConfig`].
pub struct CombatEngineBuilder {
    config: EngineConfig,
    store: Option<Arc<dyn DuelStore>>,
    characters: Option<Arc<dyn CharacterStatsClient>>,
    clock: Option<Arc<dyn Clock>>,
}

impl CombatEngineBuilder {
    fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            store: None,
            characters: None,
            clock: None,
        }
    }

    /// Override engine configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: Arc<dyn DuelStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the HTTP character client
    pub fn characters(mut self, characters: Arc<dyn CharacterStatsClient>) -> Self {
        self.characters = Some(characters);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the engine and start the reward worker
    pub async fn build(self) -> Result<CombatEngine> {
        let config = self.config;

        let characters = match self.characters {
            Some(characters) => characters,
            None => {
                let url = config.character_service_url.as_deref().ok_or_else(|| {
                    CombatError::Configuration("CHARACTER_SERVICE_URL is not set".to_string())
                })?;
                let client = HttpCharacterClient::new(url, config.character_service_timeout)
                    .map_err(|e| CombatError::Configuration(e.to_string()))?;
                Arc::new(client) as Arc<dyn CharacterStatsClient>
            }
        };

        let store = match (self.store, &config.data_dir) {
            (Some(store), _) => store,
            (None, Some(dir)) => Arc::new(FileDuelStore::new(dir).await?) as Arc<dyn DuelStore>,
            (None, None) => Arc::new(InMemoryDuelStore::new()) as Arc<dyn DuelStore>,
        };

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        let events = EventBus::with_capacity(config.event_buffer_size);

        let (job_tx, job_rx) = mpsc::channel::<RewardJob>(config.reward_queue_size);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let reward_worker = RewardWorker::new(
            TerminationHandler::new(Arc::clone(&characters)),
            job_rx,
            shutdown_rx,
            events.clone(),
        );
        let reward_worker_handle = tokio::spawn(async move {
            reward_worker.run().await;
        });

        let lifecycle = DuelLifecycleManager::new(
            characters,
            Arc::clone(&store),
            Arc::clone(&clock),
            events.clone(),
        );
        let resolver = ActionResolver::new(
            Arc::clone(&store),
            clock,
            config.rules.clone(),
            RewardDispatcher::new(job_tx),
            events.clone(),
        );

        info!(
            target: "duel::engine",
            draw_after_secs = config.rules.draw_after.num_seconds(),
            draw_check = ?config.rules.draw_check,
            persistent = config.data_dir.is_some(),
            "combat engine started"
        );

        Ok(CombatEngine {
            lifecycle,
            resolver,
            store,
            events,
            shutdown_tx,
            reward_worker_handle,
        })
    }
}
