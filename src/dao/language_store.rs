use std::sync::Arc;

use tracing::warn;

use crate::dao::{
    kv_store::{KeyValueStore, read_json, write_json},
    storage::StorageResult,
};

const LANGUAGE_SUFFIX: &str = "language";

/// Persists the player's chosen display language.
pub struct LanguageStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl LanguageStore {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            store,
            key: format!("{namespace}:{LANGUAGE_SUFFIX}"),
        }
    }

    pub fn read_language(&self) -> StorageResult<Option<String>> {
        read_json(self.store.as_ref(), &self.key)
    }

    /// Saved language, or `None` when nothing usable is stored.
    pub fn load_language(&self) -> Option<String> {
        match self.read_language() {
            Ok(language) => language,
            Err(err) => {
                warn!(key = %self.key, error = %err, "could not load saved language");
                None
            }
        }
    }

    pub fn save_language(&self, language: &str) -> StorageResult<()> {
        write_json(self.store.as_ref(), &self.key, language)
    }
}
