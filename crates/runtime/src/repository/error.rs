//! Error types raised by duel store implementations.

use duel_core::DuelId;
use thiserror::Error;

/// Errors surfaced by duel store implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("duel store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("duel {0} already exists")]
    AlreadyExists(DuelId),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
