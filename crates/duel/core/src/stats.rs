//! Combat stat snapshot copied into a duel at creation.

use serde::{Deserialize, Serialize};

/// Computed (post-item-bonus) attributes of a character.
///
/// The snapshot is taken once when the duel is created and never refreshed,
/// so later progression of the source character has no effect on a running
/// duel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStats {
    pub strength: i32,
    pub agility: i32,
    pub intelligence: i32,
    pub faith: i32,
}

impl CombatStats {
    pub const fn new(strength: i32, agility: i32, intelligence: i32, faith: i32) -> Self {
        Self {
            strength,
            agility,
            intelligence,
            faith,
        }
    }

    /// Physical power used by attacks.
    pub const fn physical(&self) -> i32 {
        self.strength.saturating_add(self.agility)
    }
}
