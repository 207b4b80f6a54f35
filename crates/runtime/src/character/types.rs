//! Character documents as served by the character service.

use duel_core::{CharacterId, CombatStats, ItemId, UserId};
use serde::{Deserialize, Serialize};

/// A character with its computed (post-item-bonus) stats and inventory.
///
/// Missing stat fields are read as zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSnapshot {
    pub id: CharacterId,
    #[serde(alias = "createdBy")]
    pub owner_user_id: UserId,
    #[serde(default)]
    pub name: String,
    pub health: i32,
    #[serde(default)]
    pub strength: i32,
    #[serde(default)]
    pub agility: i32,
    #[serde(default)]
    pub intelligence: i32,
    #[serde(default)]
    pub faith: i32,
    #[serde(default)]
    pub items: Vec<InventoryEntry>,
}

impl CharacterSnapshot {
    pub fn combat_stats(&self) -> CombatStats {
        CombatStats::new(self.strength, self.agility, self.intelligence, self.faith)
    }

    /// First inventory entry in the order the service returned it.
    pub fn first_item(&self) -> Option<&InventoryEntry> {
        self.items.first()
    }
}

/// Ownership link between a character and an item.
///
/// The service may return either the link row with a nested `item`, or a bare
/// item. The nested item id wins when both are present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemRef>,
}

impl InventoryEntry {
    pub fn item_id(&self) -> Option<&ItemId> {
        self.item.as_ref().map(|item| &item.id).or(self.id.as_ref())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of the item transfer request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransferItemRequest<'a> {
    pub from_character_id: &'a CharacterId,
    pub to_character_id: &'a CharacterId,
    pub item_id: &'a ItemId,
}
