//! Duel creation.

use std::sync::Arc;

use duel_core::{CharacterId, Combatant, Duel, DuelId, UserId};
use tracing::info;

use crate::api::{CombatError, Result};
use crate::auth::AuthToken;
use crate::character::{CharacterSnapshot, CharacterStatsClient};
use crate::clock::Clock;
use crate::events::{DuelEvent, EventBus};
use crate::repository::DuelStore;

/// Creates duels from the character service's current view of both sides.
#[derive(Clone)]
pub struct DuelLifecycleManager {
    characters: Arc<dyn CharacterStatsClient>,
    store: Arc<dyn DuelStore>,
    clock: Arc<dyn Clock>,
    events: EventBus,
}

impl DuelLifecycleManager {
    pub fn new(
        characters: Arc<dyn CharacterStatsClient>,
        store: Arc<dyn DuelStore>,
        clock: Arc<dyn Clock>,
        events: EventBus,
    ) -> Self {
        Self {
            characters,
            store,
            clock,
            events,
        }
    }

    /// Starts a duel between `attacker_id` and `defender_id`.
    ///
    /// Only the owner of the attacking character may challenge. Starting HP is
    /// each character's current health, which may already be zero.
    pub async fn challenge(
        &self,
        attacker_id: &CharacterId,
        defender_id: &CharacterId,
        caller: &UserId,
        token: &AuthToken,
    ) -> Result<Duel> {
        let (attacker, defender) = tokio::try_join!(
            self.characters.fetch_character(attacker_id, token),
            self.characters.fetch_character(defender_id, token),
        )?;

        if &attacker.owner_user_id != caller {
            return Err(CombatError::PermissionDenied(
                "Only the character owner can initiate".to_string(),
            ));
        }

        let duel = Duel::new(
            DuelId::new(),
            combatant(attacker),
            combatant(defender),
            self.clock.now(),
        );
        self.store.create(&duel).await?;

        info!(
            target: "duel::lifecycle",
            duel = %duel.id(),
            attacker = %duel.attacker().character_id(),
            defender = %duel.defender().character_id(),
            "duel created"
        );
        self.events.publish(DuelEvent::Created {
            duel_id: duel.id(),
            attacker: duel.attacker().character_id().clone(),
            defender: duel.defender().character_id().clone(),
        });

        Ok(duel)
    }
}

fn combatant(snapshot: CharacterSnapshot) -> Combatant {
    let stats = snapshot.combat_stats();
    Combatant::new(
        snapshot.id,
        snapshot.owner_user_id,
        snapshot.name,
        stats,
        snapshot.health,
    )
}
