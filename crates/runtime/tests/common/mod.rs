//! Shared fakes for the runtime integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use duel_core::{CharacterId, DuelId, ItemId, UserId};
use duel_runtime::{
    AuthError, AuthProvider, AuthToken, CharacterSnapshot, CharacterStatsClient, CombatEngine,
    CombatService, DuelEvent, EngineConfig, InMemoryDuelStore, InventoryEntry, ItemRef,
    ManualClock, Principal, Role, UpstreamError,
};
use tokio::sync::broadcast;

pub const ALICE: &str = "user-alice";
pub const BOB: &str = "user-bob";
pub const MALLORY: &str = "user-mallory";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
}

/// Bearer token accepted by [`StaticAuth`] for `user`.
pub fn token_for(user: &str) -> AuthToken {
    AuthToken::new(format!("token-{user}"))
}

pub fn header_for(user: &str) -> String {
    format!("Bearer token-{user}")
}

/// Builds a character snapshot. `stats` is strength, agility, intelligence, faith.
pub fn character(
    id: &str,
    owner: &str,
    health: i32,
    stats: [i32; 4],
    items: &[&str],
) -> CharacterSnapshot {
    let [strength, agility, intelligence, faith] = stats;
    CharacterSnapshot {
        id: CharacterId::new(id),
        owner_user_id: UserId::new(owner),
        name: id.to_uppercase(),
        health,
        strength,
        agility,
        intelligence,
        faith,
        items: items
            .iter()
            .map(|item| InventoryEntry {
                id: None,
                item: Some(ItemRef {
                    id: ItemId::new(*item),
                    name: None,
                }),
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub from: CharacterId,
    pub to: CharacterId,
    pub item: ItemId,
}

/// In-memory character service. Transfers move items between inventories.
#[derive(Default)]
pub struct FakeCharacterClient {
    characters: Mutex<HashMap<CharacterId, CharacterSnapshot>>,
    fetch_failures: Mutex<HashMap<CharacterId, UpstreamError>>,
    transfer_failure: Mutex<Option<UpstreamError>>,
    transfers: Mutex<Vec<Transfer>>,
    transfer_delay: Mutex<Option<Duration>>,
}

impl FakeCharacterClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, snapshot: CharacterSnapshot) {
        self.characters
            .lock()
            .unwrap()
            .insert(snapshot.id.clone(), snapshot);
    }

    pub fn fail_fetch(&self, id: &str, error: UpstreamError) {
        self.fetch_failures
            .lock()
            .unwrap()
            .insert(CharacterId::new(id), error);
    }

    pub fn fail_transfers(&self, error: UpstreamError) {
        *self.transfer_failure.lock().unwrap() = Some(error);
    }

    pub fn delay_transfers(&self, delay: Duration) {
        *self.transfer_delay.lock().unwrap() = Some(delay);
    }

    pub fn transfers(&self) -> Vec<Transfer> {
        self.transfers.lock().unwrap().clone()
    }

    pub fn inventory(&self, id: &str) -> Vec<ItemId> {
        self.characters
            .lock()
            .unwrap()
            .get(&CharacterId::new(id))
            .map(|snapshot| {
                snapshot
                    .items
                    .iter()
                    .filter_map(|entry| entry.item_id().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl CharacterStatsClient for FakeCharacterClient {
    async fn fetch_character(
        &self,
        id: &CharacterId,
        _token: &AuthToken,
    ) -> Result<CharacterSnapshot, UpstreamError> {
        if let Some(error) = self.fetch_failures.lock().unwrap().get(id) {
            return Err(error.clone());
        }
        self.characters
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| UpstreamError::from_response(404, r#"{"message":"Character not found"}"#))
    }

    async fn transfer_item(
        &self,
        from: &CharacterId,
        to: &CharacterId,
        item: &ItemId,
        _token: &AuthToken,
    ) -> Result<(), UpstreamError> {
        let delay = *self.transfer_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.transfer_failure.lock().unwrap().clone() {
            return Err(error);
        }

        let mut characters = self.characters.lock().unwrap();
        let entry = {
            let source = characters
                .get_mut(from)
                .ok_or_else(|| UpstreamError::from_response(404, "unknown source"))?;
            let position = source
                .items
                .iter()
                .position(|entry| entry.item_id() == Some(item))
                .ok_or_else(|| UpstreamError::from_response(400, "item not owned"))?;
            source.items.remove(position)
        };
        if let Some(target) = characters.get_mut(to) {
            target.items.push(entry);
        }

        self.transfers.lock().unwrap().push(Transfer {
            from: from.clone(),
            to: to.clone(),
            item: item.clone(),
        });
        Ok(())
    }
}

/// Accepts `token-<user>` for every user in its allow list.
pub struct StaticAuth {
    users: HashSet<String>,
}

impl StaticAuth {
    pub fn new(users: &[&str]) -> Self {
        Self {
            users: users.iter().map(|user| user.to_string()).collect(),
        }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn verify(&self, token: &AuthToken) -> Result<Principal, AuthError> {
        let user = token
            .as_str()
            .strip_prefix("token-")
            .filter(|user| self.users.contains(*user))
            .ok_or(AuthError::InvalidToken)?;
        Ok(Principal::new(user, Role::User))
    }
}

/// Engine wired to fakes, with the clock parked at [`t0`].
pub struct Harness {
    pub engine: CombatEngine,
    pub characters: Arc<FakeCharacterClient>,
    pub store: Arc<InMemoryDuelStore>,
    pub clock: ManualClock,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_config(EngineConfig::default()).await
    }

    pub async fn with_config(config: EngineConfig) -> Self {
        let characters = Arc::new(FakeCharacterClient::new());
        let store = Arc::new(InMemoryDuelStore::new());
        let clock = ManualClock::new(t0());

        let engine = CombatEngine::builder()
            .config(config)
            .characters(characters.clone())
            .store(store.clone())
            .clock(Arc::new(clock.clone()))
            .build()
            .await
            .expect("engine should build with injected collaborators");

        Self {
            engine,
            characters,
            store,
            clock,
        }
    }

    pub fn service(&self) -> CombatService {
        self.engine
            .service(Arc::new(StaticAuth::new(&[ALICE, BOB, MALLORY])))
    }

    /// Creates a duel between two characters that must already be registered.
    pub async fn challenge(&self, attacker: &str, defender: &str, caller: &str) -> DuelId {
        self.engine
            .lifecycle()
            .challenge(
                &CharacterId::new(attacker),
                &CharacterId::new(defender),
                &UserId::new(caller),
                &token_for(caller),
            )
            .await
            .expect("challenge should succeed")
            .id()
    }
}

/// Waits for the next reward event, skipping everything else.
pub async fn next_reward_event(rx: &mut broadcast::Receiver<DuelEvent>) -> DuelEvent {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = rx.recv().await.expect("event bus closed");
            if event.is_reward() {
                return event;
            }
        }
    })
    .await
    .expect("reward event should arrive")
}
