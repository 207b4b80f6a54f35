//! Unified error type surfaced by the combat engine.
//!
//! Each variant maps onto one status code so a transport layer can answer
//! without inspecting error text. Internal failures keep their detail in the
//! logs and hand the caller a generic message.

use duel_core::{ActionError, ActionKind, DuelId};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use crate::auth::AuthError;
pub use crate::character::UpstreamError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, CombatError>;

#[derive(Debug, Error)]
pub enum CombatError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("duel {0} not found")]
    NotFound(DuelId),

    #[error("{kind} on cooldown, retry in {retry_after_ms}ms")]
    RateLimited {
        kind: ActionKind,
        retry_after_ms: i64,
    },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("engine misconfigured: {0}")]
    Configuration(String),

    #[error("reward worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

/// Response body for a failed operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl CombatError {
    /// Maps a rejected action on `duel_id` to the engine error.
    ///
    /// A concluded duel is reported exactly like a missing one.
    pub fn from_action(duel_id: DuelId, error: ActionError) -> Self {
        match error {
            ActionError::Concluded { .. } => CombatError::NotFound(duel_id),
            ActionError::NotParticipant => {
                CombatError::PermissionDenied("Not a participant".to_string())
            }
            ActionError::OnCooldown { kind, retry_after } => CombatError::RateLimited {
                kind,
                retry_after_ms: retry_after.num_milliseconds(),
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            CombatError::Validation(_) => 400,
            CombatError::Unauthorized(_) => 401,
            CombatError::PermissionDenied(_) => 403,
            CombatError::NotFound(_) => 404,
            CombatError::RateLimited { .. } => 429,
            CombatError::Upstream(error) => error.status().unwrap_or(502),
            CombatError::Repository(_)
            | CombatError::Configuration(_)
            | CombatError::WorkerJoin(_) => 500,
        }
    }

    /// True for failures whose detail must not reach the caller.
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500 && !matches!(self, CombatError::Upstream(_))
    }

    pub fn to_body(&self) -> ErrorBody {
        match self {
            CombatError::NotFound(_) => ErrorBody {
                message: "Duel not found".to_string(),
                details: None,
            },
            CombatError::RateLimited { kind, .. } => ErrorBody {
                message: format!("{kind} on cooldown"),
                details: None,
            },
            CombatError::Upstream(error) => ErrorBody {
                message: "Character service error".to_string(),
                details: error.body().cloned(),
            },
            error if error.is_internal() => ErrorBody {
                message: "Internal server error".to_string(),
                details: None,
            },
            error => ErrorBody {
                message: error.to_string(),
                details: None,
            },
        }
    }
}
