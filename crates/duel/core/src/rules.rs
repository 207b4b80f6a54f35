//! Duel tunables: cooldowns and the timeout-to-draw rule.

use chrono::TimeDelta;

use crate::action::ActionKind;

/// Which action kinds evaluate the timeout-to-draw rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawCheck {
    /// Only attacks can end a stale duel in a draw.
    #[default]
    AttackOnly,
    /// Every action kind checks the duel age first.
    AllActions,
}

impl DrawCheck {
    pub fn covers(&self, kind: ActionKind) -> bool {
        match self {
            DrawCheck::AttackOnly => kind == ActionKind::Attack,
            DrawCheck::AllActions => true,
        }
    }
}

/// Rule parameters shared by every duel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuelRules {
    pub attack_cooldown: TimeDelta,
    pub cast_cooldown: TimeDelta,
    pub heal_cooldown: TimeDelta,
    /// A duel older than this ends in a draw when a covered action arrives.
    pub draw_after: TimeDelta,
    pub draw_check: DrawCheck,
}

impl DuelRules {
    pub const DEFAULT_ATTACK_COOLDOWN_MS: i64 = 1_000;
    pub const DEFAULT_CAST_COOLDOWN_MS: i64 = 2_000;
    pub const DEFAULT_HEAL_COOLDOWN_MS: i64 = 2_000;
    pub const DEFAULT_DRAW_AFTER_SECS: i64 = 5 * 60;

    pub fn new() -> Self {
        Self {
            attack_cooldown: TimeDelta::milliseconds(Self::DEFAULT_ATTACK_COOLDOWN_MS),
            cast_cooldown: TimeDelta::milliseconds(Self::DEFAULT_CAST_COOLDOWN_MS),
            heal_cooldown: TimeDelta::milliseconds(Self::DEFAULT_HEAL_COOLDOWN_MS),
            draw_after: TimeDelta::seconds(Self::DEFAULT_DRAW_AFTER_SECS),
            draw_check: DrawCheck::default(),
        }
    }

    pub fn with_draw_after(mut self, draw_after: TimeDelta) -> Self {
        self.draw_after = draw_after;
        self
    }

    pub fn with_draw_check(mut self, draw_check: DrawCheck) -> Self {
        self.draw_check = draw_check;
        self
    }

    /// Minimum spacing between two actions of `kind` on the same duel.
    pub fn cooldown(&self, kind: ActionKind) -> TimeDelta {
        match kind {
            ActionKind::Attack => self.attack_cooldown,
            ActionKind::Cast => self.cast_cooldown,
            ActionKind::Heal => self.heal_cooldown,
        }
    }
}

impl Default for DuelRules {
    fn default() -> Self {
        Self::new()
    }
}
