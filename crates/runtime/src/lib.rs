//! Async runtime around the duel rules in `duel-core`.
//!
//! This crate wires duel storage, the character service port, per-duel locks
//! and the reward worker into a cohesive engine. Consumers embed
//! [`CombatEngine`] and drive it through [`CombatService`], or through the
//! lower-level [`DuelLifecycleManager`] and [`ActionResolver`].
//!
//! Modules are organized by responsibility:
//! - [`engine`] hosts the orchestrator and builder
//! - [`api`] exposes the request façade and the unified error type
//! - [`lifecycle`], [`resolver`] and [`termination`] implement the duel flow
//! - [`character`] and [`auth`] are the ports to external services
//! - [`repository`] persists duels; [`locks`] serializes access to each one
//! - [`events`] broadcasts duel notifications
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod auth;
pub mod character;
pub mod clock;
pub mod config;
pub mod engine;
pub mod events;
pub mod lifecycle;
pub mod locks;
pub mod logging;
pub mod repository;
pub mod resolver;
pub mod termination;

mod workers;

pub use api::{ChallengeRequest, CombatError, CombatService, ErrorBody, Result};
pub use auth::{AuthError, AuthProvider, AuthToken, Principal, Role, bearer_token};
pub use character::{
    CharacterSnapshot, CharacterStatsClient, HttpCharacterClient, InventoryEntry, ItemRef,
    UpstreamError,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use engine::{CombatEngine, CombatEngineBuilder};
pub use events::{DuelEvent, EventBus};
pub use lifecycle::DuelLifecycleManager;
pub use locks::{DuelLockGuard, DuelLocks};
pub use repository::{DuelStore, FileDuelStore, InMemoryDuelStore, RepositoryError};
pub use resolver::{ActionResolver, ActionResponse, DrawResult};
pub use termination::{RewardOutcome, TerminationHandler};
