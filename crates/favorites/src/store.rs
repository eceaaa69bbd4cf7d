//! The key-value store seam the registry persists through.
//!
//! The registry only ever needs `get` and `set` on string values, so any
//! backend that can do that (a file per key, an in-memory map, a platform
//! preference store) can stand behind it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Mutex as AsyncMutex;

use crate::error::{Result, StorageError};

/// Async string key-value store.
///
/// `Send + Sync` lets one store handle be shared between the registry and
/// whatever else the application runs on the same runtime.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `Ok(None)` when nothing has been written yet
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key` as a single write
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Lock guarding read-modify-write cycles on `key`.
    ///
    /// Every handle onto the same underlying data must get the same lock
    /// back, so that registries sharing a store queue behind each other.
    fn write_lock(&self, key: &str) -> Arc<AsyncMutex<()>>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value).await
    }

    fn write_lock(&self, key: &str) -> Arc<AsyncMutex<()>> {
        (**self).write_lock(key)
    }
}

/// One async lock per key, created on first use
#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_for(&self, key: &str) -> Arc<AsyncMutex<()>> {
        // The map is only ever inserted into, so a poisoned guard is still usable
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(key.to_string()).or_default().clone()
    }
}

/// In-process store, used by tests and for sessions that should not persist
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    locks: KeyLocks,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `value` under `key`
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.into(), value.into());
        }
        store
    }

    /// Synchronous peek, handy for assertions
    pub fn snapshot(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| StorageError::Backend("memory store lock poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Backend("memory store lock poisoned".into()))?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn write_lock(&self, key: &str) -> Arc<AsyncMutex<()>> {
        self.locks.lock_for(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("@FavoriteList").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_set_replaces_value() {
        let store = MemoryStore::with_value("k", "old");
        store.set("k", "new".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));
        assert_eq!(store.snapshot("k").as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_shared_store_through_arc() {
        let store = Arc::new(MemoryStore::new());
        let handle: Arc<MemoryStore> = store.clone();
        handle.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.snapshot("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_write_lock_is_shared_per_key() {
        let store = Arc::new(MemoryStore::new());
        let handle = store.clone();

        assert!(Arc::ptr_eq(&store.write_lock("a"), &handle.write_lock("a")));
        assert!(!Arc::ptr_eq(&store.write_lock("a"), &store.write_lock("b")));
        assert!(!Arc::ptr_eq(
            &store.write_lock("a"),
            &MemoryStore::new().write_lock("a")
        ));
    }
}
