//! Caller identity.
//!
//! Token verification belongs to the identity service; the engine only needs
//! the verified user id and must forward the raw credential to the character
//! service on the caller's behalf.

use std::fmt;

use async_trait::async_trait;
use duel_core::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role carried in a verified credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    GameMaster,
}

/// Verified caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}

/// Raw bearer credential. Kept out of `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or invalid token")]
    MissingCredentials,

    #[error("invalid or expired token")]
    InvalidToken,
}

/// Verifies bearer credentials issued by the identity service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn verify(&self, token: &AuthToken) -> Result<Principal, AuthError>;
}

/// Extracts the credential from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<AuthToken, AuthError> {
    let token = header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingCredentials)?;
    Ok(AuthToken::new(token))
}
