use std::sync::Arc;

use crate::dao::{
    kv_store::{KeyValueStore, read_json, write_json},
    models::LeaderboardEntryEntity,
    storage::StorageResult,
};

const LEADERBOARD_SUFFIX: &str = "leaderboard";

/// Persists the ordered leaderboard list as a single document (replace-on-write).
#[derive(Clone)]
pub struct LeaderboardStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl LeaderboardStore {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            store,
            key: format!("{namespace}:{LEADERBOARD_SUFFIX}"),
        }
    }

    /// Storage key the list lives under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored list in its persisted order; an absent document is an empty list.
    pub fn load_entries(&self) -> StorageResult<Vec<LeaderboardEntryEntity>> {
        Ok(read_json(self.store.as_ref(), &self.key)?.unwrap_or_default())
    }

    /// Replace the stored list with `entries`.
    pub fn save_entries(&self, entries: &[LeaderboardEntryEntity]) -> StorageResult<()> {
        write_json(self.store.as_ref(), &self.key, entries)
    }

    /// Drop the stored list.
    pub fn clear(&self) -> StorageResult<()> {
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use serde_json::json;

    use super::*;
    use crate::dao::kv_store::memory::MemoryStore;

    fn entity(score: u32) -> LeaderboardEntryEntity {
        let mut metadata = IndexMap::new();
        metadata.insert("level".to_string(), json!(score / 10 + 1));
        LeaderboardEntryEntity {
            score,
            date: "2026-10-18".into(),
            metadata,
        }
    }

    #[test]
    fn empty_when_nothing_saved() {
        let store = LeaderboardStore::new(Arc::new(MemoryStore::new()), "test");
        assert!(store.load_entries().unwrap().is_empty());
    }

    #[test]
    fn save_replaces_previous_list() {
        let store = LeaderboardStore::new(Arc::new(MemoryStore::new()), "test");
        store.save_entries(&[entity(9), entity(5)]).unwrap();
        store.save_entries(&[entity(3)]).unwrap();
        assert_eq!(store.load_entries().unwrap(), vec![entity(3)]);
    }

    #[test]
    fn clear_removes_the_document() {
        let backend = Arc::new(MemoryStore::new());
        let store = LeaderboardStore::new(backend.clone(), "test");
        store.save_entries(&[entity(1)]).unwrap();
        store.clear().unwrap();
        assert_eq!(backend.get("test:leaderboard").unwrap(), None);
    }

    #[test]
    fn entries_without_metadata_still_decode() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set("test:leaderboard", r#"[{"score":4,"date":"2026-01-01"}]"#)
            .unwrap();
        let store = LeaderboardStore::new(backend, "test");
        let entries = store.load_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].metadata.is_empty());
    }
}
