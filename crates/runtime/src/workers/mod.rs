//! Worker tasks that back the combat engine.
//!
//! The reward worker owns the post-duel item handoff so the action path never
//! waits on it.

mod reward;

pub use reward::{RewardDispatcher, RewardJob, RewardWorker};
