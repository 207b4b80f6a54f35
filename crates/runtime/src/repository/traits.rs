//! Duel store contract.

use async_trait::async_trait;
use duel_core::{Duel, DuelId};

use super::Result;

/// Repository for duel persistence.
///
/// Every field of [`Duel`] must survive a save/load round trip.
#[async_trait]
pub trait DuelStore: Send + Sync {
    /// Load a duel regardless of its status.
    async fn find_by_id(&self, id: DuelId) -> Result<Option<Duel>>;

    /// Insert a newly created duel. Fails if the id is already taken.
    async fn create(&self, duel: &Duel) -> Result<()>;

    /// Overwrite the stored copy of a duel.
    async fn save(&self, duel: &Duel) -> Result<()>;

    /// Load a duel only while it is still in progress.
    ///
    /// Finished and drawn duels are reported as absent.
    async fn find_active_by_id(&self, id: DuelId) -> Result<Option<Duel>> {
        Ok(self.find_by_id(id).await?.filter(Duel::is_active))
    }
}
