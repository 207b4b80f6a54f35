//! Port to the character service.
//!
//! The engine reads ownership and stat snapshots through
//! [`CharacterStatsClient`] and hands the duel reward over through the same
//! port. [`HttpCharacterClient`] talks to the real service; tests substitute
//! their own implementation.

mod error;
mod http;
mod types;

pub use error::UpstreamError;
pub use http::HttpCharacterClient;
pub use types::{CharacterSnapshot, InventoryEntry, ItemRef};

use async_trait::async_trait;
use duel_core::{CharacterId, ItemId};

use crate::auth::AuthToken;

#[async_trait]
pub trait CharacterStatsClient: Send + Sync {
    /// Fetch a character with computed stats and its inventory.
    async fn fetch_character(
        &self,
        id: &CharacterId,
        token: &AuthToken,
    ) -> Result<CharacterSnapshot, UpstreamError>;

    /// Move one item from `from` to `to`.
    async fn transfer_item(
        &self,
        from: &CharacterId,
        to: &CharacterId,
        item: &ItemId,
        token: &AuthToken,
    ) -> Result<(), UpstreamError>;
}
