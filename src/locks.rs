//! Per-key reader/writer locks for serializing work on shared resources.
//!
//! Automation runs often touch the same platform resource from many tasks at
//! once: several inputs reading a property set while another replaces it.
//! [`KeyedLockTable`] hands out one reader/writer lock per string key, created
//! on first use and kept for the life of the table.
//!
//! # Semantics
//!
//! - Any number of readers may hold a key at once
//! - A writer excludes readers and other writers of the same key
//! - Locks for different keys never block each other
//! - Concurrent first use of a key resolves to a single lock
//!
//! Guards release on drop. [`KeyWriteGuard::unlock`] and
//! [`KeyReadGuard::unlock`] exist for call sites that want the release to be
//! visible in the code. Releasing a lock that is not held, or releasing it in
//! the wrong mode, cannot be expressed.
//!
//! # Example
//!
//! ```rust
//! use automation_provider::locks::KeyedLockTable;
//!
//! # tokio_test::block_on(async {
//! let table = KeyedLockTable::new();
//!
//! let first = table.read_lock("/resources/web").await;
//! let second = table.read_lock("/resources/web").await;
//! assert!(table.try_lock("/resources/web").is_none());
//!
//! first.unlock();
//! second.unlock();
//! assert!(table.try_lock("/resources/web").is_some());
//! # });
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// A table of reader/writer locks keyed by string.
///
/// The table is cheap to share behind an [`Arc`]; [`KeyedLockTable::global`]
/// returns the process-wide instance.
#[derive(Default)]
pub struct KeyedLockTable {
    locks: Mutex<HashMap<String, Arc<RwLock<()>>>>,
}

// Verify KeyedLockTable and its guards are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<KeyedLockTable>();
    assert_send_sync::<KeyWriteGuard>();
    assert_send_sync::<KeyReadGuard>();
};

impl KeyedLockTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide table.
    ///
    /// Every call returns a handle to the same table, so independent
    /// components that lock the same key exclude each other.
    #[must_use]
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<KeyedLockTable>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    /// Returns the lock for `key`, creating it if this is the first use.
    ///
    /// Concurrent first calls for the same key all receive the same lock.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Arc<RwLock<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = locks.get(key) {
            return Arc::clone(lock);
        }
        tracing::trace!(key, "creating lock");
        let lock = Arc::new(RwLock::new(()));
        locks.insert(key.to_string(), Arc::clone(&lock));
        lock
    }

    /// Acquires `key` exclusively, waiting for all current holders.
    pub async fn lock(&self, key: &str) -> KeyWriteGuard {
        let guard = self.resolve(key).write_owned().await;
        tracing::trace!(key, "acquired exclusive lock");
        KeyWriteGuard {
            key: key.to_string(),
            _guard: guard,
        }
    }

    /// Acquires `key` in shared mode, waiting for any exclusive holder.
    pub async fn read_lock(&self, key: &str) -> KeyReadGuard {
        let guard = self.resolve(key).read_owned().await;
        tracing::trace!(key, "acquired shared lock");
        KeyReadGuard {
            key: key.to_string(),
            _guard: guard,
        }
    }

    /// Acquires `key` exclusively if nobody holds it.
    #[must_use]
    pub fn try_lock(&self, key: &str) -> Option<KeyWriteGuard> {
        let guard = self.resolve(key).try_write_owned().ok()?;
        Some(KeyWriteGuard {
            key: key.to_string(),
            _guard: guard,
        })
    }

    /// Acquires `key` in shared mode if no writer holds it.
    #[must_use]
    pub fn try_read_lock(&self, key: &str) -> Option<KeyReadGuard> {
        let guard = self.resolve(key).try_read_owned().ok()?;
        Some(KeyReadGuard {
            key: key.to_string(),
            _guard: guard,
        })
    }

    /// Returns the number of keys that have a lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no key has been locked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` has a lock.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }
}

impl fmt::Debug for KeyedLockTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedLockTable")
            .field("keys", &self.len())
            .finish()
    }
}

/// Exclusive hold on one key. Released on drop.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct KeyWriteGuard {
    key: String,
    _guard: OwnedRwLockWriteGuard<()>,
}

impl KeyWriteGuard {
    /// The key this guard holds.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Releases the lock.
    pub fn unlock(self) {
        tracing::trace!(key = %self.key, "released exclusive lock");
    }
}

impl fmt::Debug for KeyWriteGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyWriteGuard")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

/// Shared hold on one key. Released on drop.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct KeyReadGuard {
    key: String,
    _guard: OwnedRwLockReadGuard<()>,
}

impl KeyReadGuard {
    /// The key this guard holds.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Releases the lock.
    pub fn unlock(self) {
        tracing::trace!(key = %self.key, "released shared lock");
    }
}

impl fmt::Debug for KeyReadGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyReadGuard")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
