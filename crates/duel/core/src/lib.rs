//! Deterministic duel rules shared by the combat runtime.
//!
//! `duel-core` defines the [`Duel`] aggregate, the three [`ActionKind`]s and
//! their formulas, and [`DuelEngine`], the only place a duel is mutated after
//! creation. Nothing here performs I/O; time is always passed in by the caller.
pub mod action;
pub mod duel;
pub mod engine;
pub mod ids;
pub mod rules;
pub mod stats;

pub use action::{ActionKind, Effect};
pub use duel::{Combatant, Cooldowns, Duel, DuelStatus, Side};
pub use engine::{ActionError, ActionOutcome, AppliedAction, DuelEngine, Termination, is_expired};
pub use ids::{CharacterId, DuelId, ItemId, UserId};
pub use rules::{DrawCheck, DuelRules};
pub use stats::CombatStats;
