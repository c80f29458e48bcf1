#[cfg(feature = "file-store")]
pub mod file;
pub mod memory;

use serde::{Serialize, de::DeserializeOwned};

use crate::dao::storage::{StorageError, StorageResult};

/// Abstraction over the durable key-value medium backing scores and leaderboards.
///
/// Values are JSON documents stored as strings. Calls are synchronous and must never
/// panic; every failure is reported through [`StorageResult`].
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
    fn health_check(&self) -> StorageResult<()>;
}

/// Read and decode the JSON value stored under `key`, if any.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> StorageResult<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::malformed(key, source))
}

/// Encode `value` as JSON and replace whatever was stored under `key`.
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::malformed(key, source))?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::{memory::MemoryStore, *};

    #[test]
    fn read_json_returns_none_for_missing_key() {
        let store = MemoryStore::new();
        let value: Option<Vec<u32>> = read_json(&store, "missing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn write_then_read_json() {
        let store = MemoryStore::new();
        write_json(&store, "numbers", &vec![3_u32, 1, 2]).unwrap();
        let value: Option<Vec<u32>> = read_json(&store, "numbers").unwrap();
        assert_eq!(value, Some(vec![3, 1, 2]));
    }

    #[test]
    fn undecodable_value_is_malformed() {
        let store = MemoryStore::new();
        store.set("numbers", "{not json").unwrap();
        let err = read_json::<Vec<u32>>(&store, "numbers").unwrap_err();
        assert!(err.is_malformed());
    }
}
