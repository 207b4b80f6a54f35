//! Action kinds and their effect formulas.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::stats::CombatStats;

/// The three actions a participant can take in a duel.
///
/// | kind   | effect                       | target        |
/// |--------|------------------------------|---------------|
/// | attack | strength + agility           | opponent (clamped at 0) |
/// | cast   | 2 × intelligence             | opponent (unclamped)    |
/// | heal   | faith                        | self                    |
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ActionKind {
    Attack,
    Cast,
    Heal,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Computes the effect of this action from the acting side's snapshot.
    pub fn effect(self, stats: &CombatStats) -> Effect {
        match self {
            ActionKind::Attack => Effect::Damage {
                amount: stats.physical(),
                clamp: true,
            },
            ActionKind::Cast => Effect::Damage {
                amount: stats.intelligence.saturating_mul(2),
                clamp: false,
            },
            ActionKind::Heal => Effect::Heal {
                amount: stats.faith,
            },
        }
    }
}

/// HP change produced by an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Effect {
    /// Lowers the opponent's HP. When `clamp` is set the result never drops below zero.
    Damage { amount: i32, clamp: bool },
    /// Raises the actor's own HP without an upper bound.
    Heal { amount: i32 },
}

impl Effect {
    pub fn amount(&self) -> i32 {
        match self {
            Effect::Damage { amount, .. } | Effect::Heal { amount } => *amount,
        }
    }

    /// Returns the HP that results from applying this effect to `hp`.
    pub fn apply_to(&self, hp: i32) -> i32 {
        match *self {
            Effect::Damage {
                amount,
                clamp: true,
            } => hp.saturating_sub(amount).max(0),
            Effect::Damage {
                amount,
                clamp: false,
            } => hp.saturating_sub(amount),
            Effect::Heal { amount } => hp.saturating_add(amount),
        }
    }

    pub fn targets_opponent(&self) -> bool {
        matches!(self, Effect::Damage { .. })
    }
}
