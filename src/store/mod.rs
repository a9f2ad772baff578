//! In-memory sprinkle store
//!
//! One record per sprinkle keyed by `(room_id, token)` with a unique index on
//! that pair, plus a lock table keyed by the same identity. The lock table is
//! the exclusive-lock-capable read path the claim protocol needs: a caller
//! that holds a key's lock is the only writer for that sprinkle, while reads
//! stay lock-free (and may observe a momentarily stale record).

pub mod membership;

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::Sprinkle;
use crate::error::{AppError, AppResult};

pub use membership::RoomDirectory;

/// Storage key: the unique `(room_id, token)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SprinkleKey {
    pub room_id: String,
    pub token: String,
}

impl SprinkleKey {
    pub fn new(room_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            token: token.into(),
        }
    }
}

impl From<&Sprinkle> for SprinkleKey {
    fn from(sprinkle: &Sprinkle) -> Self {
        Self::new(sprinkle.room_id.clone(), sprinkle.token.clone())
    }
}

/// Guard proving exclusive write access to one sprinkle record.
///
/// Dropped on every exit path of the critical section, success or failure.
pub type SprinkleLockGuard = OwnedMutexGuard<()>;

/// In-memory persistence substrate for sprinkles.
#[derive(Debug, Default)]
pub struct SprinkleStore {
    records: DashMap<SprinkleKey, Sprinkle>,
    locks: DashMap<SprinkleKey, Arc<Mutex<()>>>,
}

impl SprinkleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created sprinkle.
    ///
    /// Fails when the `(room_id, token)` pair is already taken, so token
    /// collisions surface here and nothing is overwritten.
    pub fn insert_new(&self, sprinkle: Sprinkle) -> Result<(), Sprinkle> {
        match self.records.entry(SprinkleKey::from(&sprinkle)) {
            Entry::Occupied(_) => Err(sprinkle),
            Entry::Vacant(vacant) => {
                vacant.insert(sprinkle);
                Ok(())
            }
        }
    }

    /// Lock-free read returning a snapshot of the record.
    ///
    /// The snapshot may be stale relative to an in-flight claim; callers that
    /// intend to mutate must re-read under `lock_for_update`.
    pub fn find(&self, key: &SprinkleKey) -> Option<Sprinkle> {
        self.records.get(key).map(|entry| entry.value().clone())
    }

    /// Acquire the exclusive per-sprinkle lock, waiting at most `wait`.
    ///
    /// Blocks until granted with no fairness guarantee among waiters; a
    /// timeout surfaces as the retryable `LockBusy` error rather than
    /// blocking indefinitely.
    pub async fn lock_for_update(
        &self,
        key: &SprinkleKey,
        wait: Duration,
    ) -> AppResult<SprinkleLockGuard> {
        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();

        tokio::time::timeout(wait, lock.lock_owned())
            .await
            .map_err(|_| AppError::LockBusy)
    }

    /// Write a mutated record back.
    ///
    /// Must only be called while holding the record's lock guard.
    pub fn save(&self, sprinkle: Sprinkle) {
        self.records.insert(SprinkleKey::from(&sprinkle), sprinkle);
    }
}
