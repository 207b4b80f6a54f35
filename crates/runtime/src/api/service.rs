//! Request handling for challenges and actions.

use std::str::FromStr;
use std::sync::Arc;

use duel_core::{ActionKind, CharacterId, Duel, DuelId};
use serde::Deserialize;
use tracing::error;

use super::{CombatError, Result};
use crate::auth::{AuthProvider, AuthToken, Principal, bearer_token};
use crate::lifecycle::DuelLifecycleManager;
use crate::resolver::{ActionResolver, ActionResponse};

/// Body of a challenge request.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    #[serde(default)]
    pub attacker_id: String,
    #[serde(default)]
    pub defender_id: String,
}

impl ChallengeRequest {
    pub fn new(attacker_id: impl Into<String>, defender_id: impl Into<String>) -> Self {
        Self {
            attacker_id: attacker_id.into(),
            defender_id: defender_id.into(),
        }
    }
}

#[derive(Clone)]
pub struct CombatService {
    auth: Arc<dyn AuthProvider>,
    lifecycle: DuelLifecycleManager,
    resolver: ActionResolver,
}

impl CombatService {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        lifecycle: DuelLifecycleManager,
        resolver: ActionResolver,
    ) -> Self {
        Self {
            auth,
            lifecycle,
            resolver,
        }
    }

    /// Starts a duel. Answers 201 on success.
    pub async fn challenge(
        &self,
        authorization: Option<&str>,
        request: ChallengeRequest,
    ) -> Result<Duel> {
        let (principal, token) = self.authenticate(authorization).await?;

        let attacker_id = CharacterId::new(request.attacker_id);
        let defender_id = CharacterId::new(request.defender_id);
        if attacker_id.is_empty() || defender_id.is_empty() {
            return Err(CombatError::Validation(
                "attackerId and defenderId are required".to_string(),
            ));
        }

        self.lifecycle
            .challenge(&attacker_id, &defender_id, &principal.user_id, &token)
            .await
            .inspect_err(log_internal)
    }

    /// Runs `kind` (`attack`, `cast`, or `heal`) against `duel_id`.
    pub async fn action(
        &self,
        authorization: Option<&str>,
        duel_id: &str,
        kind: &str,
    ) -> Result<ActionResponse> {
        let (principal, token) = self.authenticate(authorization).await?;

        let duel_id = DuelId::from_str(duel_id.trim())
            .map_err(|_| CombatError::Validation(format!("invalid duel id: {duel_id}")))?;
        let kind = ActionKind::from_str(kind.trim())
            .map_err(|_| CombatError::Validation(format!("unknown action: {kind}")))?;

        self.resolver
            .apply_action(duel_id, kind, &principal.user_id, &token)
            .await
            .inspect_err(log_internal)
    }

    async fn authenticate(&self, authorization: Option<&str>) -> Result<(Principal, AuthToken)> {
        let token = bearer_token(authorization)?;
        let principal = self.auth.verify(&token).await?;
        Ok((principal, token))
    }
}

fn log_internal(error: &CombatError) {
    if error.is_internal() {
        error!(target: "duel::api", error = %error, "request failed");
    }
}
