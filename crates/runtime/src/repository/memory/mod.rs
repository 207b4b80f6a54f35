//! In-memory duel store for tests and single-process deployments.

mod duel;

pub use duel::InMemoryDuelStore;
