use std::{
    num::ParseIntError,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};

use tracing::warn;

use crate::dao::{
    kv_store::{KeyValueStore, read_json, write_json},
    models::BestScoreEntity,
    storage::{StorageError, StorageResult},
};

const BEST_SCORE_SUFFIX: &str = "best-score";

/// Persists the single best-score integer and keeps a cached copy for the session.
///
/// The cache is authoritative for reads once loaded: when the backend refuses a write,
/// the new best score still lives on in memory until the process exits.
pub struct ScoreStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    best: AtomicU32,
}

impl ScoreStore {
    /// Bind the store to `namespace` and prime the cache from storage.
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        let score_store = Self {
            store,
            key: format!("{namespace}:{BEST_SCORE_SUFFIX}"),
            best: AtomicU32::new(0),
        };
        let loaded = score_store.load_best_score();
        score_store.best.store(loaded, Ordering::SeqCst);
        score_store
    }

    /// Storage key the best score lives under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted best score, reporting every failure explicitly.
    pub fn read_best_score(&self) -> StorageResult<u32> {
        match read_json::<BestScoreEntity>(self.store.as_ref(), &self.key)? {
            None => Ok(0),
            Some(BestScoreEntity::Number(score)) => Ok(score),
            Some(BestScoreEntity::Text(text)) => text
                .trim()
                .parse::<u32>()
                .map_err(|source: ParseIntError| StorageError::malformed(&self.key, source)),
        }
    }

    /// Read the persisted best score, falling back to 0 on any failure.
    pub fn load_best_score(&self) -> u32 {
        match self.read_best_score() {
            Ok(score) => score,
            Err(err) => {
                warn!(key = %self.key, error = %err, "could not load best score; using 0");
                0
            }
        }
    }

    /// Cached best score.
    pub fn best_score(&self) -> u32 {
        self.best.load(Ordering::SeqCst)
    }

    /// Record `score` as the new best score, in memory first and then in storage.
    pub fn save_best_score(&self, score: u32) -> StorageResult<()> {
        self.best.store(score, Ordering::SeqCst);
        write_json(self.store.as_ref(), &self.key, &BestScoreEntity::Number(score))
    }

    /// Forget the best score. Independent from the leaderboard entries.
    pub fn reset(&self) -> StorageResult<()> {
        self.best.store(0, Ordering::SeqCst);
        self.store.remove(&self.key)
    }
}
