//! Per-duel mutual exclusion.
//!
//! Every action on a duel runs load → validate → mutate → persist while holding
//! that duel's guard, so two requests for the same duel never interleave.
//! Actions on different duels take different guards and run in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use duel_core::DuelId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;
type Registry = Arc<Mutex<HashMap<DuelId, Entry>>>;

struct Entry {
    lock: Slot,
    /// Holders plus waiters.
    users: usize,
}

/// Registry of per-duel async mutexes.
///
/// Entries are created on first use and dropped once the last holder or
/// waiter lets go, so the map only ever contains duels with in-flight actions.
/// A waiter that is cancelled before it gets the lock leaves too.
#[derive(Clone, Default)]
pub struct DuelLocks {
    slots: Registry,
}

impl DuelLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other action holds `id`, then returns the guard.
    pub async fn acquire(&self, id: DuelId) -> DuelLockGuard {
        let slot = {
            let mut slots = lock_registry(&self.slots);
            let entry = slots.entry(id).or_insert_with(|| Entry {
                lock: Slot::default(),
                users: 0,
            });
            entry.users += 1;
            Arc::clone(&entry.lock)
        };
        // Registered before the wait so cancellation also releases the entry.
        let lease = Lease {
            id,
            slots: Arc::clone(&self.slots),
        };

        let guard = slot.lock_owned().await;
        DuelLockGuard {
            _guard: guard,
            lease,
        }
    }

    /// Number of duels that currently have a holder or waiters.
    pub fn in_flight(&self) -> usize {
        lock_registry(&self.slots).len()
    }
}

fn lock_registry(slots: &Registry) -> MutexGuard<'_, HashMap<DuelId, Entry>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One user's claim on a registry entry.
struct Lease {
    id: DuelId,
    slots: Registry,
}

impl Drop for Lease {
    fn drop(&mut self) {
        let mut slots = lock_registry(&self.slots);
        if let Some(entry) = slots.get_mut(&self.id) {
            entry.users -= 1;
            if entry.users == 0 {
                slots.remove(&self.id);
            }
        }
    }
}

/// Exclusive access to one duel. Released on drop.
pub struct DuelLockGuard {
    // Field order matters: the mutex is released before the lease is returned.
    _guard: OwnedMutexGuard<()>,
    lease: Lease,
}

impl DuelLockGuard {
    pub fn duel_id(&self) -> DuelId {
        self.lease.id
    }
}
