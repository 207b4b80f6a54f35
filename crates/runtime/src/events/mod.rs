//! Duel notifications.
//!
//! Every state change and every reward handoff is published on the
//! [`EventBus`]. Publishing is best-effort: a bus with no subscribers simply
//! drops the event.

mod bus;

pub use bus::EventBus;

use duel_core::{AppliedAction, CharacterId, DuelId, ItemId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum DuelEvent {
    Created {
        duel_id: DuelId,
        attacker: CharacterId,
        defender: CharacterId,
    },
    ActionApplied {
        duel_id: DuelId,
        action: AppliedAction,
    },
    Finished {
        duel_id: DuelId,
        winner: CharacterId,
        loser: CharacterId,
    },
    Drawn {
        duel_id: DuelId,
    },
    RewardTransferred {
        duel_id: DuelId,
        item_id: ItemId,
        from: CharacterId,
        to: CharacterId,
    },
    /// The loser had nothing that could be handed over.
    RewardSkipped {
        duel_id: DuelId,
        loser: CharacterId,
    },
    RewardFailed {
        duel_id: DuelId,
        loser: CharacterId,
        error: String,
    },
}

impl DuelEvent {
    pub fn duel_id(&self) -> DuelId {
        match self {
            DuelEvent::Created { duel_id, .. }
            | DuelEvent::ActionApplied { duel_id, .. }
            | DuelEvent::Finished { duel_id, .. }
            | DuelEvent::Drawn { duel_id }
            | DuelEvent::RewardTransferred { duel_id, .. }
            | DuelEvent::RewardSkipped { duel_id, .. }
            | DuelEvent::RewardFailed { duel_id, .. } => *duel_id,
        }
    }

    /// True for the events emitted once the reward handoff has run.
    pub fn is_reward(&self) -> bool {
        matches!(
            self,
            DuelEvent::RewardTransferred { .. }
                | DuelEvent::RewardSkipped { .. }
                | DuelEvent::RewardFailed { .. }
        )
    }
}
