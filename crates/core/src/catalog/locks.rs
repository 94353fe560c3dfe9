//! Per-item serialization.
//!
//! Asset-affecting operations on one item id run one at a time. Each id maps
//! to an async mutex slot; slots are created on demand and pruned once no
//! holder or waiter references them.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::CoreError;
use crate::types::DbId;

type Slots = DashMap<DbId, Arc<Mutex<()>>>;

/// Keyed mutex map. Cheap to clone; clones share the same slots.
#[derive(Debug, Clone, Default)]
pub struct ItemLocks {
    slots: Arc<Slots>,
}

impl ItemLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait up to `timeout` for exclusive access to item `id`.
    ///
    /// Times out with a retryable [`CoreError::Conflict`].
    pub async fn acquire(&self, id: DbId, timeout: Duration) -> Result<ItemGuard, CoreError> {
        let slot = Arc::clone(self.slots.entry(id).or_default().value());
        match tokio::time::timeout(timeout, slot.lock_owned()).await {
            Ok(guard) => Ok(ItemGuard {
                id,
                guard: Some(guard),
                slots: Arc::clone(&self.slots),
            }),
            Err(_) => {
                prune(&self.slots, id);
                tracing::warn!(item_id = id, timeout_ms = timeout.as_millis() as u64, "Item lock acquisition timed out");
                Err(CoreError::Conflict(format!(
                    "Item {id} is being modified by another request; retry later"
                )))
            }
        }
    }

    /// Number of live slots (held or awaited).
    pub fn active_slots(&self) -> usize {
        self.slots.len()
    }
}

fn prune(slots: &Slots, id: DbId) {
    slots.remove_if(&id, |_, slot| Arc::strong_count(slot) == 1);
}

/// Exclusive access to one item. Released on drop.
#[derive(Debug)]
pub struct ItemGuard {
    id: DbId,
    guard: Option<OwnedMutexGuard<()>>,
    slots: Arc<Slots>,
}

impl ItemGuard {
    pub fn id(&self) -> DbId {
        self.id
    }
}

impl Drop for ItemGuard {
    fn drop(&mut self) {
        // Unlock first so the guard's own reference no longer counts.
        drop(self.guard.take());
        prune(&self.slots, self.id);
    }
}
