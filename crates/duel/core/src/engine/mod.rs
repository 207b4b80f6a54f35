//! The single state transition shared by attack, cast, and heal.
//!
//! [`DuelEngine`] borrows a duel mutably and runs one action against it:
//!
//! 1. reject concluded duels
//! 2. timeout-to-draw (only for kinds covered by [`DuelRules::draw_check`])
//! 3. participant check
//! 4. shared cooldown check
//! 5. apply the effect and stamp the cooldown
//! 6. termination detection
//!
//! Validation failures return before any field is written, so a rejected
//! action never leaves a partially mutated duel behind.

mod errors;

pub use errors::ActionError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::{ActionKind, Effect};
use crate::duel::{Duel, Side};
use crate::ids::{CharacterId, UserId};
use crate::rules::DuelRules;

/// Details of an action that went through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedAction {
    pub kind: ActionKind,
    pub actor: Side,
    pub target: Side,
    pub effect: Effect,
    /// HP of the target after the effect.
    pub target_hp: i32,
}

/// Winner and loser of a duel that just finished.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Termination {
    pub winner: CharacterId,
    pub loser: CharacterId,
}

/// Result of a successful [`DuelEngine::execute`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The effect was applied. `termination` is set when this action ended the duel.
    Applied {
        action: AppliedAction,
        termination: Option<Termination>,
    },
    /// The duel had run past its time limit and was closed as a draw instead.
    Drawn,
}

impl ActionOutcome {
    pub fn termination(&self) -> Option<&Termination> {
        match self {
            ActionOutcome::Applied { termination, .. } => termination.as_ref(),
            ActionOutcome::Drawn => None,
        }
    }
}

/// Executes actions against a borrowed duel.
pub struct DuelEngine<'a> {
    duel: &'a mut Duel,
    rules: &'a DuelRules,
}

impl<'a> DuelEngine<'a> {
    pub fn new(duel: &'a mut Duel, rules: &'a DuelRules) -> Self {
        Self { duel, rules }
    }

    /// Runs `kind` on behalf of `caller` at time `now`.
    pub fn execute(
        &mut self,
        kind: ActionKind,
        caller: &UserId,
        now: DateTime<Utc>,
    ) -> Result<ActionOutcome, ActionError> {
        if !self.duel.is_active() {
            return Err(ActionError::Concluded {
                status: self.duel.status(),
            });
        }

        if self.rules.draw_check.covers(kind) && is_expired(self.duel, self.rules, now) {
            self.duel.draw();
            return Ok(ActionOutcome::Drawn);
        }

        let actor = self
            .duel
            .side_of(caller)
            .ok_or(ActionError::NotParticipant)?;

        self.check_cooldown(kind, now)?;

        let action = self.apply(kind, actor, now);
        let termination = self.detect_termination();

        Ok(ActionOutcome::Applied {
            action,
            termination,
        })
    }

    fn check_cooldown(&self, kind: ActionKind, now: DateTime<Utc>) -> Result<(), ActionError> {
        let Some(last) = self.duel.cooldowns().last_used(kind) else {
            return Ok(());
        };

        let cooldown = self.rules.cooldown(kind);
        let elapsed = now - last;
        if elapsed < cooldown {
            return Err(ActionError::OnCooldown {
                kind,
                retry_after: cooldown - elapsed,
            });
        }
        Ok(())
    }

    fn apply(&mut self, kind: ActionKind, actor: Side, now: DateTime<Utc>) -> AppliedAction {
        let effect = kind.effect(self.duel.combatant(actor).stats());
        let target = if effect.targets_opponent() {
            actor.opponent()
        } else {
            actor
        };

        let combatant = self.duel.combatant_mut(target);
        let target_hp = effect.apply_to(combatant.hp());
        combatant.set_hp(target_hp);

        self.duel.cooldowns_mut().mark_used(kind, now);

        AppliedAction {
            kind,
            actor,
            target,
            effect,
            target_hp,
        }
    }

    /// Finishes the duel once either side is at or below zero HP. If both
    /// sides are down, the attacker is declared the winner.
    fn detect_termination(&mut self) -> Option<Termination> {
        let attacker_down = self.duel.attacker().is_down();
        let defender_down = self.duel.defender().is_down();
        if !attacker_down && !defender_down {
            return None;
        }

        let winner = if attacker_down && !defender_down {
            Side::Defender
        } else {
            Side::Attacker
        };
        self.duel.finish(winner);

        Some(Termination {
            winner: self.duel.combatant(winner).character_id().clone(),
            loser: self.duel.combatant(winner.opponent()).character_id().clone(),
        })
    }
}

/// True when the duel has been running for longer than the draw limit.
pub fn is_expired(duel: &Duel, rules: &DuelRules, now: DateTime<Utc>) -> bool {
    now - duel.created_at() > rules.draw_after
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duel::{Combatant, DuelStatus};
    use crate::ids::DuelId;
    use crate::rules::DrawCheck;
    use crate::stats::CombatStats;
    use chrono::{TimeDelta, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn ms(n: i64) -> TimeDelta {
        TimeDelta::milliseconds(n)
    }

    fn attacker_user() -> UserId {
        UserId::new("user-a")
    }

    fn defender_user() -> UserId {
        UserId::new("user-d")
    }

    fn duel(attacker: (CombatStats, i32), defender: (CombatStats, i32)) -> Duel {
        Duel::new(
            DuelId::new(),
            Combatant::new(
                CharacterId::new("char-a"),
                attacker_user(),
                "Attacker",
                attacker.0,
                attacker.1,
            ),
            Combatant::new(
                CharacterId::new("char-d"),
                defender_user(),
                "Defender",
                defender.0,
                defender.1,
            ),
            t0(),
        )
    }

    fn run(
        duel: &mut Duel,
        kind: ActionKind,
        caller: &UserId,
        now: DateTime<Utc>,
    ) -> Result<ActionOutcome, ActionError> {
        let rules = DuelRules::default();
        DuelEngine::new(duel, &rules).execute(kind, caller, now)
    }

    #[test]
    fn attack_scenario_leaves_duel_running() {
        let mut d = duel(
            (CombatStats::new(10, 5, 0, 0), 50),
            (CombatStats::default(), 20),
        );

        let outcome = run(&mut d, ActionKind::Attack, &attacker_user(), t0()).unwrap();

        assert!(outcome.termination().is_none());
        assert_eq!(d.defender().hp(), 5);
        assert_eq!(d.status(), DuelStatus::InProgress);
        assert_eq!(d.cooldowns().last_used(ActionKind::Attack), Some(t0()));
    }

    #[test]
    fn cast_scenario_finishes_with_negative_hp() {
        let mut d = duel(
            (CombatStats::new(0, 0, 10, 0), 50),
            (CombatStats::default(), 15),
        );

        let outcome = run(&mut d, ActionKind::Cast, &attacker_user(), t0()).unwrap();

        assert_eq!(d.defender().hp(), -5);
        assert_eq!(d.status(), DuelStatus::Finished);
        assert_eq!(d.winner_id(), Some(&CharacterId::new("char-a")));
        assert_eq!(
            outcome.termination(),
            Some(&Termination {
                winner: CharacterId::new("char-a"),
                loser: CharacterId::new("char-d"),
            })
        );
    }

    #[test]
    fn attack_clamps_target_at_zero_and_finishes() {
        let mut d = duel(
            (CombatStats::default(), 30),
            (CombatStats::new(50, 50, 0, 0), 30),
        );

        run(&mut d, ActionKind::Attack, &defender_user(), t0()).unwrap();

        assert_eq!(d.attacker().hp(), 0);
        assert_eq!(d.status(), DuelStatus::Finished);
        assert_eq!(d.winner_id(), Some(&CharacterId::new("char-d")));
        assert_eq!(d.loser_id(), Some(&CharacterId::new("char-a")));
    }

    #[test]
    fn heal_raises_own_hp() {
        let mut d = duel(
            (CombatStats::default(), 10),
            (CombatStats::new(0, 0, 0, 9), 10),
        );

        let outcome = run(&mut d, ActionKind::Heal, &defender_user(), t0()).unwrap();

        assert_eq!(d.defender().hp(), 19);
        assert_eq!(d.attacker().hp(), 10);
        match outcome {
            ActionOutcome::Applied { action, .. } => {
                assert_eq!(action.actor, Side::Defender);
                assert_eq!(action.target, Side::Defender);
                assert_eq!(action.target_hp, 19);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn second_action_within_cooldown_is_rejected_without_mutation() {
        let mut d = duel(
            (CombatStats::new(1, 1, 0, 0), 100),
            (CombatStats::default(), 100),
        );
        run(&mut d, ActionKind::Attack, &attacker_user(), t0()).unwrap();
        let after_first = d.clone();

        let err = run(&mut d, ActionKind::Attack, &attacker_user(), t0() + ms(400)).unwrap_err();

        assert_eq!(
            err,
            ActionError::OnCooldown {
                kind: ActionKind::Attack,
                retry_after: ms(600),
            }
        );
        assert_eq!(d, after_first);
    }

    #[test]
    fn cooldown_is_shared_between_sides() {
        let mut d = duel(
            (CombatStats::new(0, 0, 1, 0), 100),
            (CombatStats::new(0, 0, 1, 0), 100),
        );
        run(&mut d, ActionKind::Cast, &attacker_user(), t0()).unwrap();

        let err = run(&mut d, ActionKind::Cast, &defender_user(), t0() + ms(1999)).unwrap_err();
        assert!(matches!(err, ActionError::OnCooldown { .. }));

        run(&mut d, ActionKind::Cast, &defender_user(), t0() + ms(2000)).unwrap();
        assert_eq!(d.attacker().hp(), 98);
    }

    #[test]
    fn cooldowns_are_independent_per_kind() {
        let mut d = duel(
            (CombatStats::new(1, 0, 1, 1), 100),
            (CombatStats::default(), 100),
        );
        run(&mut d, ActionKind::Attack, &attacker_user(), t0()).unwrap();
        run(&mut d, ActionKind::Cast, &attacker_user(), t0()).unwrap();
        run(&mut d, ActionKind::Heal, &attacker_user(), t0()).unwrap();
        assert_eq!(d.defender().hp(), 97);
        assert_eq!(d.attacker().hp(), 101);
    }

    #[test]
    fn outsider_is_rejected() {
        let mut d = duel((CombatStats::default(), 10), (CombatStats::default(), 10));
        let before = d.clone();

        let err = run(&mut d, ActionKind::Heal, &UserId::new("stranger"), t0()).unwrap_err();

        assert_eq!(err, ActionError::NotParticipant);
        assert_eq!(d, before);
    }

    #[test]
    fn concluded_duel_rejects_every_kind() {
        let mut d = duel(
            (CombatStats::new(0, 0, 100, 0), 10),
            (CombatStats::default(), 10),
        );
        run(&mut d, ActionKind::Cast, &attacker_user(), t0()).unwrap();
        assert_eq!(d.status(), DuelStatus::Finished);

        for kind in [ActionKind::Attack, ActionKind::Cast, ActionKind::Heal] {
            let later = t0() + TimeDelta::seconds(10);
            let err = run(&mut d, kind, &defender_user(), later).unwrap_err();
            assert_eq!(
                err,
                ActionError::Concluded {
                    status: DuelStatus::Finished
                }
            );
        }
    }

    #[test]
    fn stale_attack_draws_without_damage_even_from_outsider() {
        let mut d = duel(
            (CombatStats::new(5, 5, 0, 0), 10),
            (CombatStats::default(), 10),
        );
        let late = t0() + TimeDelta::minutes(5) + ms(1);

        let outcome = run(&mut d, ActionKind::Attack, &UserId::new("stranger"), late).unwrap();

        assert_eq!(outcome, ActionOutcome::Drawn);
        assert_eq!(d.status(), DuelStatus::Draw);
        assert!(d.winner_id().is_none());
        assert_eq!(d.defender().hp(), 10);
        assert!(d.cooldowns().last_used(ActionKind::Attack).is_none());
    }

    #[test]
    fn exactly_five_minutes_is_not_expired() {
        let mut d = duel(
            (CombatStats::new(1, 0, 0, 0), 10),
            (CombatStats::default(), 10),
        );
        let edge = t0() + TimeDelta::minutes(5);

        run(&mut d, ActionKind::Attack, &attacker_user(), edge).unwrap();
        assert_eq!(d.status(), DuelStatus::InProgress);
        assert_eq!(d.defender().hp(), 9);
    }

    #[test]
    fn stale_cast_still_applies_with_default_scope() {
        let mut d = duel(
            (CombatStats::new(0, 0, 1, 0), 10),
            (CombatStats::default(), 10),
        );
        let late = t0() + TimeDelta::hours(1);

        run(&mut d, ActionKind::Cast, &attacker_user(), late).unwrap();
        assert_eq!(d.status(), DuelStatus::InProgress);
        assert_eq!(d.defender().hp(), 8);
    }

    #[test]
    fn widened_draw_scope_covers_heal() {
        let mut d = duel(
            (CombatStats::new(0, 0, 0, 3), 10),
            (CombatStats::default(), 10),
        );
        let rules = DuelRules::default().with_draw_check(DrawCheck::AllActions);
        let late = t0() + TimeDelta::hours(1);

        let outcome = DuelEngine::new(&mut d, &rules)
            .execute(ActionKind::Heal, &attacker_user(), late)
            .unwrap();

        assert_eq!(outcome, ActionOutcome::Drawn);
        assert_eq!(d.attacker().hp(), 10);
    }

    #[test]
    fn attacker_wins_when_both_sides_are_down() {
        // Characters can enter a duel with zero health.
        let mut d = duel(
            (CombatStats::new(0, 0, 10, 0), 0),
            (CombatStats::default(), 5),
        );

        run(&mut d, ActionKind::Cast, &attacker_user(), t0()).unwrap();

        assert_eq!(d.defender().hp(), -15);
        assert_eq!(d.status(), DuelStatus::Finished);
        assert_eq!(d.winner_id(), Some(&CharacterId::new("char-a")));
    }

    #[test]
    fn zero_hp_challenger_loses_on_first_action() {
        let mut d = duel(
            (CombatStats::default(), 0),
            (CombatStats::new(0, 0, 0, 1), 10),
        );

        let outcome = run(&mut d, ActionKind::Heal, &defender_user(), t0()).unwrap();

        assert_eq!(
            outcome.termination().map(|t| t.winner.clone()),
            Some(CharacterId::new("char-d"))
        );
    }
}
