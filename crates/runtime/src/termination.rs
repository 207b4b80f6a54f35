//! Post-duel reward handoff.
//!
//! When a duel finishes the loser forfeits the first item of its inventory to
//! the winner. The handoff is best-effort: every failure is logged and
//! reported as a [`RewardOutcome`], never raised to the caller that ended the
//! duel.

use std::sync::Arc;

use duel_core::{ItemId, Termination};
use tracing::{debug, info, warn};

use crate::auth::AuthToken;
use crate::character::{CharacterStatsClient, UpstreamError};

/// What happened to the loser's item.
#[derive(Debug, Clone, PartialEq)]
pub enum RewardOutcome {
    Transferred { item_id: ItemId },
    /// The loser owns nothing.
    NoItems,
    /// The first inventory entry carries no usable item id.
    MissingItemId,
    Failed(UpstreamError),
}

impl RewardOutcome {
    pub fn is_transferred(&self) -> bool {
        matches!(self, RewardOutcome::Transferred { .. })
    }
}

#[derive(Clone)]
pub struct TerminationHandler {
    characters: Arc<dyn CharacterStatsClient>,
}

impl TerminationHandler {
    pub fn new(characters: Arc<dyn CharacterStatsClient>) -> Self {
        Self { characters }
    }

    /// Hands the loser's first item to the winner on the caller's credential.
    pub async fn on_terminate(&self, termination: &Termination, token: &AuthToken) -> RewardOutcome {
        let Termination { winner, loser } = termination;

        let loser_snapshot = match self.characters.fetch_character(loser, token).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(
                    target: "duel::reward",
                    loser = %loser,
                    error = %error,
                    "failed to load loser inventory"
                );
                return RewardOutcome::Failed(error);
            }
        };

        let Some(entry) = loser_snapshot.first_item() else {
            debug!(target: "duel::reward", loser = %loser, "loser has no items");
            return RewardOutcome::NoItems;
        };

        let Some(item_id) = entry.item_id().filter(|id| !id.is_empty()).cloned() else {
            warn!(target: "duel::reward", loser = %loser, "first inventory entry has no item id");
            return RewardOutcome::MissingItemId;
        };

        match self
            .characters
            .transfer_item(loser, winner, &item_id, token)
            .await
        {
            Ok(()) => {
                info!(
                    target: "duel::reward",
                    item = %item_id,
                    from = %loser,
                    to = %winner,
                    "reward transferred"
                );
                RewardOutcome::Transferred { item_id }
            }
            Err(error) => {
                warn!(
                    target: "duel::reward",
                    item = %item_id,
                    from = %loser,
                    to = %winner,
                    error = %error,
                    "reward transfer failed"
                );
                RewardOutcome::Failed(error)
            }
        }
    }
}
