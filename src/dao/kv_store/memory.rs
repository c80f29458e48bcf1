use std::{
    io,
    sync::atomic::{AtomicBool, Ordering},
};

use dashmap::DashMap;

use crate::dao::{
    kv_store::KeyValueStore,
    storage::{StorageError, StorageResult},
};

/// Volatile store used when no durable medium is configured, and by tests.
///
/// The store can be switched off to emulate disabled or full storage: every call then
/// fails with [`StorageError::Unavailable`].
#[derive(Debug)]
pub struct MemoryStore {
    values: DashMap<String, String>,
    available: AtomicBool,
}

impl MemoryStore {
    /// Create an empty, available store.
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
            available: AtomicBool::new(true),
        }
    }

    /// Create a store that rejects every operation.
    pub fn unavailable() -> Self {
        let store = Self::new();
        store.set_available(false);
        store
    }

    /// Toggle availability without dropping stored values.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> StorageResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::unavailable(
                "in-memory store disabled".into(),
                io::Error::new(io::ErrorKind::PermissionDenied, "storage disabled"),
            ))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.values.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.ensure_available()?;
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.ensure_available()?;
        self.values.remove(key);
        Ok(())
    }

    fn health_check(&self) -> StorageResult<()> {
        self.ensure_available()
    }
}
