//! Action resolution against stored duels.
//!
//! [`ActionResolver`] owns the load → validate → mutate → persist sequence for
//! attack, cast, and heal. The whole sequence runs under the duel's lock, so
//! concurrent requests for one duel are applied one at a time and a duel can
//! only be finished once.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use duel_core::{
    ActionKind, ActionOutcome, Duel, DuelEngine, DuelId, DuelRules, DuelStatus, UserId,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::api::{CombatError, Result};
use crate::auth::AuthToken;
use crate::clock::Clock;
use crate::events::{DuelEvent, EventBus};
use crate::locks::DuelLocks;
use crate::repository::DuelStore;
use crate::workers::{RewardDispatcher, RewardJob};

/// Body returned when an action closed the duel as a draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResult {
    pub duel_id: DuelId,
    pub message: String,
    pub status: DuelStatus,
}

impl DrawResult {
    fn new(duel_id: DuelId) -> Self {
        Self {
            duel_id,
            message: "Duel ended in a draw".to_string(),
            status: DuelStatus::Draw,
        }
    }
}

/// Result of an accepted action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    /// The effect was applied; carries the duel as persisted.
    Duel(Duel),
    Draw(DrawResult),
}

impl ActionResponse {
    pub fn duel(&self) -> Option<&Duel> {
        match self {
            ActionResponse::Duel(duel) => Some(duel),
            ActionResponse::Draw(_) => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, ActionResponse::Draw(_))
    }
}

#[derive(Clone)]
pub struct ActionResolver {
    store: Arc<dyn DuelStore>,
    locks: DuelLocks,
    clock: Arc<dyn Clock>,
    rules: DuelRules,
    rewards: RewardDispatcher,
    events: EventBus,
}

impl ActionResolver {
    pub(crate) fn new(
        store: Arc<dyn DuelStore>,
        clock: Arc<dyn Clock>,
        rules: DuelRules,
        rewards: RewardDispatcher,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            locks: DuelLocks::new(),
            clock,
            rules,
            rewards,
            events,
        }
    }

    pub fn rules(&self) -> &DuelRules {
        &self.rules
    }

    /// Applies `kind` on behalf of `caller`, reading the clock once the
    /// duel's lock is held.
    pub async fn apply_action(
        &self,
        duel_id: DuelId,
        kind: ActionKind,
        caller: &UserId,
        token: &AuthToken,
    ) -> Result<ActionResponse> {
        let _guard = self.locks.acquire(duel_id).await;
        let now = self.clock.now();
        self.resolve(duel_id, kind, caller, token, now).await
    }

    /// Same as [`Self::apply_action`] with an explicit timestamp.
    pub async fn apply_action_at(
        &self,
        duel_id: DuelId,
        kind: ActionKind,
        caller: &UserId,
        token: &AuthToken,
        now: DateTime<Utc>,
    ) -> Result<ActionResponse> {
        let _guard = self.locks.acquire(duel_id).await;
        self.resolve(duel_id, kind, caller, token, now).await
    }

    /// Caller must hold the lock for `duel_id`.
    async fn resolve(
        &self,
        duel_id: DuelId,
        kind: ActionKind,
        caller: &UserId,
        token: &AuthToken,
        now: DateTime<Utc>,
    ) -> Result<ActionResponse> {
        let mut duel = self
            .store
            .find_active_by_id(duel_id)
            .await?
            .ok_or(CombatError::NotFound(duel_id))?;

        let outcome = DuelEngine::new(&mut duel, &self.rules)
            .execute(kind, caller, now)
            .map_err(|error| {
                debug!(
                    target: "duel::action",
                    duel = %duel_id,
                    kind = %kind,
                    user = %caller,
                    error = %error,
                    "action rejected"
                );
                CombatError::from_action(duel_id, error)
            })?;

        self.store.save(&duel).await?;

        match outcome {
            ActionOutcome::Drawn => {
                info!(target: "duel::action", duel = %duel_id, kind = %kind, "duel timed out as a draw");
                self.events.publish(DuelEvent::Drawn { duel_id });
                Ok(ActionResponse::Draw(DrawResult::new(duel_id)))
            }
            ActionOutcome::Applied {
                action,
                termination,
            } => {
                debug!(
                    target: "duel::action",
                    duel = %duel_id,
                    kind = %kind,
                    amount = action.effect.amount(),
                    target_hp = action.target_hp,
                    "action applied"
                );
                self.events
                    .publish(DuelEvent::ActionApplied { duel_id, action });

                if let Some(termination) = termination {
                    info!(
                        target: "duel::action",
                        duel = %duel_id,
                        winner = %termination.winner,
                        loser = %termination.loser,
                        "duel finished"
                    );
                    self.events.publish(DuelEvent::Finished {
                        duel_id,
                        winner: termination.winner.clone(),
                        loser: termination.loser.clone(),
                    });
                    self.rewards
                        .dispatch(RewardJob {
                            duel_id,
                            termination,
                            token: token.clone(),
                        })
                        .await;
                }

                Ok(ActionResponse::Duel(duel))
            }
        }
    }
}
