//! In-memory storage implementation

use super::entry::Entity;
use super::error::{Result, StoreError};
use crate::clock::now_nanos;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use serde::Serialize;
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::time::Duration;
use tracing::debug;

/// Type alias for our hash map with SipHasher
type StoreMap = HashMap<String, Entity, BuildHasherDefault<SipHasher13>>;

/// Thread-safe in-memory key-value store with lazy expiration.
///
/// Expired entities stay resident until a `get`, `delete` or `get_all`
/// touches them. There is no background sweep.
///
/// Reads take an upgradable lock and only upgrade to exclusive access when
/// they have to reap, so reaping never happens under a shared lock.
pub struct MemoryStore {
    store: RwLock<StoreMap>,
}

impl MemoryStore {
    /// Create a new memory store with default capacity
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new memory store with specified initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        MemoryStore {
            store: RwLock::new(HashMap::with_capacity_and_hasher(
                capacity,
                BuildHasherDefault::<SipHasher13>::default(),
            )),
        }
    }

    /// Insert or replace the value for `key`.
    ///
    /// A zero `ttl` stores a permanent entity.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        let entity = Entity::with_ttl(key, value, ttl);
        let mut store = self.store.write();
        store.insert(entity.key.clone(), entity);
    }

    /// Get the value stored under `key`.
    ///
    /// An expired entity is removed before `KeyExpired` is returned.
    pub fn get(&self, key: &str) -> Result<String> {
        let store = self.store.upgradable_read();

        let entity = store.get(key).ok_or(StoreError::KeyNotFound)?;
        if !entity.is_expired() {
            return Ok(entity.value.clone());
        }

        let mut store = RwLockUpgradableReadGuard::upgrade(store);
        store.remove(key);
        debug!(key = %key, "reaped expired key on read");

        Err(StoreError::KeyExpired)
    }

    /// Delete a key. Expired-but-resident entities count as deleted.
    pub fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write();

        match store.remove(key) {
            Some(entity) => {
                if entity.is_expired() {
                    debug!(key = %key, "deleted expired key");
                }
                Ok(())
            }
            None => Err(StoreError::KeyNotFound),
        }
    }

    /// Snapshot of every valid entity, reaping expired ones on the way.
    ///
    /// Fails with `StorageEmpty` instead of returning an empty vector.
    pub fn get_all(&self) -> Result<Vec<Entity>> {
        let store = self.store.upgradable_read();
        let now = now_nanos();

        let mut valid = Vec::with_capacity(store.len());
        let mut expired = Vec::new();
        for entity in store.values() {
            if entity.is_expired_at(now) {
                expired.push(entity.key.clone());
            } else {
                valid.push(entity.clone());
            }
        }

        if !expired.is_empty() {
            let mut store = RwLockUpgradableReadGuard::upgrade(store);
            for key in &expired {
                store.remove(key);
            }
            debug!(count = expired.len(), "reaped expired keys during scan");
        }

        if valid.is_empty() {
            return Err(StoreError::StorageEmpty);
        }
        Ok(valid)
    }

    /// Number of resident entities, including expired ones not yet reaped
    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    /// Check if no entity is resident
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get statistics about the store without reaping anything
    pub fn stats(&self) -> StoreStats {
        let store = self.store.read();
        let now = now_nanos();

        let expired_keys = store
            .values()
            .filter(|entity| entity.is_expired_at(now))
            .count();

        StoreStats {
            total_keys: store.len(),
            expired_keys,
            active_keys: store.len() - expired_keys,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the memory store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_keys: usize,
    pub expired_keys: usize,
    pub active_keys: usize,
}
