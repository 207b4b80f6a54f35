//! Errors raised by [`super::DuelEngine::execute`].

use chrono::TimeDelta;
use thiserror::Error;

use crate::action::ActionKind;
use crate::duel::DuelStatus;

/// Why an action was rejected. A rejected action leaves the duel untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("duel already concluded with status {status}")]
    Concluded { status: DuelStatus },

    #[error("caller is not a participant of this duel")]
    NotParticipant,

    #[error("{kind} on cooldown for another {}ms", retry_after.num_milliseconds())]
    OnCooldown {
        kind: ActionKind,
        retry_after: TimeDelta,
    },
}
