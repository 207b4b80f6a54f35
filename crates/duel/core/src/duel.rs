//! The `Duel` aggregate.
//!
//! A duel pairs two character snapshots with their live HP, shared per-kind
//! cooldown timestamps, and a monotonic status. All mutation goes through
//! [`crate::engine::DuelEngine`]; everything here is read-only from outside
//! the crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::action::ActionKind;
use crate::ids::{CharacterId, DuelId, UserId};
use crate::stats::CombatStats;

/// Lifecycle status. Transitions only go from `InProgress` to a terminal state.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DuelStatus {
    #[default]
    InProgress,
    Finished,
    Draw,
}

impl DuelStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DuelStatus::InProgress)
    }
}

/// Which participant of a duel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

/// One participant: identity and stat snapshot plus the live HP.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Combatant {
    character_id: CharacterId,
    user_id: UserId,
    name: String,
    stats: CombatStats,
    hp: i32,
}

impl Combatant {
    pub fn new(
        character_id: CharacterId,
        user_id: UserId,
        name: impl Into<String>,
        stats: CombatStats,
        hp: i32,
    ) -> Self {
        Self {
            character_id,
            user_id,
            name: name.into(),
            stats,
            hp,
        }
    }

    pub fn character_id(&self) -> &CharacterId {
        &self.character_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> &CombatStats {
        &self.stats
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub(crate) fn set_hp(&mut self, hp: i32) {
        self.hp = hp;
    }

    pub fn is_down(&self) -> bool {
        self.hp <= 0
    }
}

/// Last use of each action kind. Shared by both sides of the duel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cooldowns {
    last_attack_at: Option<DateTime<Utc>>,
    last_cast_at: Option<DateTime<Utc>>,
    last_heal_at: Option<DateTime<Utc>>,
}

impl Cooldowns {
    pub fn last_used(&self, kind: ActionKind) -> Option<DateTime<Utc>> {
        match kind {
            ActionKind::Attack => self.last_attack_at,
            ActionKind::Cast => self.last_cast_at,
            ActionKind::Heal => self.last_heal_at,
        }
    }

    pub(crate) fn mark_used(&mut self, kind: ActionKind, at: DateTime<Utc>) {
        let slot = match kind {
            ActionKind::Attack => &mut self.last_attack_at,
            ActionKind::Cast => &mut self.last_cast_at,
            ActionKind::Heal => &mut self.last_heal_at,
        };
        *slot = Some(at);
    }
}

/// A fight between two characters.
///
/// Serialized as a flat record (`attackerHp`, `defenderStr`, `lastAttackAt`,
/// ...) so response bodies and stored documents share one stable schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DuelRecord", from = "DuelRecord")]
pub struct Duel {
    id: DuelId,
    attacker: Combatant,
    defender: Combatant,
    cooldowns: Cooldowns,
    status: DuelStatus,
    winner_id: Option<CharacterId>,
    created_at: DateTime<Utc>,
}

impl Duel {
    /// Creates an in-progress duel with unset cooldowns and no winner.
    pub fn new(
        id: DuelId,
        attacker: Combatant,
        defender: Combatant,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            attacker,
            defender,
            cooldowns: Cooldowns::default(),
            status: DuelStatus::InProgress,
            winner_id: None,
            created_at,
        }
    }

    pub fn id(&self) -> DuelId {
        self.id
    }

    pub fn attacker(&self) -> &Combatant {
        &self.attacker
    }

    pub fn defender(&self) -> &Combatant {
        &self.defender
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }

    pub(crate) fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Attacker => &mut self.attacker,
            Side::Defender => &mut self.defender,
        }
    }

    pub fn cooldowns(&self) -> &Cooldowns {
        &self.cooldowns
    }

    pub(crate) fn cooldowns_mut(&mut self) -> &mut Cooldowns {
        &mut self.cooldowns
    }

    pub fn status(&self) -> DuelStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == DuelStatus::InProgress
    }

    pub fn winner_id(&self) -> Option<&CharacterId> {
        self.winner_id.as_ref()
    }

    /// The losing character of a finished duel.
    pub fn loser_id(&self) -> Option<&CharacterId> {
        let winner = self.winner_id.as_ref()?;
        if winner == self.attacker.character_id() {
            Some(self.defender.character_id())
        } else {
            Some(self.attacker.character_id())
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Resolves which side `user` plays. The attacker wins ties when one user
    /// owns both characters.
    pub fn side_of(&self, user: &UserId) -> Option<Side> {
        if self.attacker.user_id() == user {
            Some(Side::Attacker)
        } else if self.defender.user_id() == user {
            Some(Side::Defender)
        } else {
            None
        }
    }

    pub(crate) fn finish(&mut self, winner: Side) {
        self.status = DuelStatus::Finished;
        self.winner_id = Some(self.combatant(winner).character_id().clone());
    }

    pub(crate) fn draw(&mut self) {
        self.status = DuelStatus::Draw;
        self.winner_id = None;
    }
}

/// Wire and storage layout of a [`Duel`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DuelRecord {
    id: DuelId,
    attacker_id: CharacterId,
    defender_id: CharacterId,
    attacker_user_id: UserId,
    defender_user_id: UserId,
    #[serde(default)]
    attacker_name: String,
    #[serde(default)]
    defender_name: String,
    attacker_hp: i32,
    defender_hp: i32,
    attacker_str: i32,
    attacker_agi: i32,
    attacker_int: i32,
    attacker_faith: i32,
    defender_str: i32,
    defender_agi: i32,
    defender_int: i32,
    defender_faith: i32,
    last_attack_at: Option<DateTime<Utc>>,
    last_cast_at: Option<DateTime<Utc>>,
    last_heal_at: Option<DateTime<Utc>>,
    status: DuelStatus,
    winner_id: Option<CharacterId>,
    created_at: DateTime<Utc>,
}

impl From<Duel> for DuelRecord {
    fn from(duel: Duel) -> Self {
        let Duel {
            id,
            attacker,
            defender,
            cooldowns,
            status,
            winner_id,
            created_at,
        } = duel;

        Self {
            id,
            attacker_id: attacker.character_id,
            defender_id: defender.character_id,
            attacker_user_id: attacker.user_id,
            defender_user_id: defender.user_id,
            attacker_name: attacker.name,
            defender_name: defender.name,
            attacker_hp: attacker.hp,
            defender_hp: defender.hp,
            attacker_str: attacker.stats.strength,
            attacker_agi: attacker.stats.agility,
            attacker_int: attacker.stats.intelligence,
            attacker_faith: attacker.stats.faith,
            defender_str: defender.stats.strength,
            defender_agi: defender.stats.agility,
            defender_int: defender.stats.intelligence,
            defender_faith: defender.stats.faith,
            last_attack_at: cooldowns.last_attack_at,
            last_cast_at: cooldowns.last_cast_at,
            last_heal_at: cooldowns.last_heal_at,
            status,
            winner_id,
            created_at,
        }
    }
}

impl From<DuelRecord> for Duel {
    fn from(record: DuelRecord) -> Self {
        Self {
            id: record.id,
            attacker: Combatant::new(
                record.attacker_id,
                record.attacker_user_id,
                record.attacker_name,
                CombatStats::new(
                    record.attacker_str,
                    record.attacker_agi,
                    record.attacker_int,
                    record.attacker_faith,
                ),
                record.attacker_hp,
            ),
            defender: Combatant::new(
                record.defender_id,
                record.defender_user_id,
                record.defender_name,
                CombatStats::new(
                    record.defender_str,
                    record.defender_agi,
                    record.defender_int,
                    record.defender_faith,
                ),
                record.defender_hp,
            ),
            cooldowns: Cooldowns {
                last_attack_at: record.last_attack_at,
                last_cast_at: record.last_cast_at,
                last_heal_at: record.last_heal_at,
            },
            status: record.status,
            winner_id: record.winner_id,
            created_at: record.created_at,
        }
    }
}
