//! In-memory DuelStore implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use duel_core::{Duel, DuelId};

use crate::repository::{DuelStore, RepositoryError, Result};

/// Stores duels in a map keyed by id.
pub struct InMemoryDuelStore {
    duels: RwLock<HashMap<DuelId, Duel>>,
}

impl InMemoryDuelStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            duels: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored duels, in any status.
    pub fn len(&self) -> usize {
        self.duels.read().map(|duels| duels.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryDuelStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DuelStore for InMemoryDuelStore {
    async fn find_by_id(&self, id: DuelId) -> Result<Option<Duel>> {
        let duels = self
            .duels
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(duels.get(&id).cloned())
    }

    async fn create(&self, duel: &Duel) -> Result<()> {
        let mut duels = self
            .duels
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        if duels.contains_key(&duel.id()) {
            return Err(RepositoryError::AlreadyExists(duel.id()));
        }
        duels.insert(duel.id(), duel.clone());
        Ok(())
    }

    async fn save(&self, duel: &Duel) -> Result<()> {
        let mut duels = self
            .duels
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        duels.insert(duel.id(), duel.clone());
        Ok(())
    }
}
