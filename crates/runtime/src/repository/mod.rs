//! Persistence for the `Duel` aggregate.
//!
//! Stores are plain load/save adapters. Serializing concurrent writers to the
//! same duel is the job of [`crate::locks::DuelLocks`], which the action
//! resolver holds around every load-mutate-save cycle.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileDuelStore;
pub use memory::InMemoryDuelStore;
pub use traits::DuelStore;
