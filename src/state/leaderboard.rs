use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    dao::{
        leaderboard_store::LeaderboardStore, models::LeaderboardEntryEntity,
        score_store::ScoreStore,
    },
    i18n::Translate,
};

/// Capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// Auxiliary fields attached to an entry; opaque to ranking.
pub type EntryMetadata = IndexMap<String, Value>;

/// A finished session's score as kept on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub score: u32,
    /// Display-only calendar date (`YYYY-MM-DD`).
    pub date: String,
    pub metadata: EntryMetadata,
}

/// Kind of notification produced by [`LeaderboardManager::add_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The score beats the stored best score.
    NewRecord,
    /// The score made it onto the board.
    TopN,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::NewRecord => "new-record",
            NotificationKind::TopN => "top-n",
        }
    }
}

/// Data describing something noteworthy about an added score. Rendering is left to
/// the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Result of [`LeaderboardManager::add_score`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddScoreOutcome {
    pub is_new_record: bool,
    /// 1-based rank of the new entry, `None` when it did not make the board.
    pub rank: Option<usize>,
    pub notifications: Vec<Notification>,
}

/// Fixed-capacity board of the best scores, sorted descending; among equal scores the
/// earlier entry ranks higher.
///
/// Storage failures never reach the caller: the board keeps working in memory and the
/// failure is logged.
pub struct LeaderboardManager {
    capacity: usize,
    entries: Vec<LeaderboardEntry>,
    store: LeaderboardStore,
    scores: Arc<ScoreStore>,
    translator: Arc<dyn Translate>,
}

impl LeaderboardManager {
    /// Build the manager and load the persisted board. A capacity of 0 is raised to 1.
    pub fn new(
        capacity: usize,
        store: LeaderboardStore,
        scores: Arc<ScoreStore>,
        translator: Arc<dyn Translate>,
    ) -> Self {
        let capacity = capacity.max(1);
        let mut entries: Vec<LeaderboardEntry> = match store.load_entries() {
            Ok(entities) => entities.into_iter().map(Into::into).collect(),
            Err(err) => {
                warn!(key = store.key(), error = %err, "could not load leaderboard; starting empty");
                Vec::new()
            }
        };
        // Stable: equal scores keep their persisted order.
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(capacity);

        Self {
            capacity,
            entries,
            store,
            scores,
            translator,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Best score as cached by the score store.
    pub fn best_score(&self) -> u32 {
        self.scores.best_score()
    }

    /// Record a finished session's score.
    pub fn add_score(&mut self, score: u32, metadata: EntryMetadata) -> AddScoreOutcome {
        let previous_best = self.scores.best_score();
        let is_new_record = score > previous_best;

        // Entries with an equal score were added earlier and stay ahead.
        let position = self.entries.partition_point(|entry| entry.score >= score);
        let rank = if position < self.capacity {
            self.entries.insert(
                position,
                LeaderboardEntry {
                    score,
                    date: today(),
                    metadata,
                },
            );
            self.entries.truncate(self.capacity);
            self.persist_entries();
            Some(position + 1)
        } else {
            None
        };

        if is_new_record {
            if let Err(err) = self.scores.save_best_score(score) {
                warn!(score, error = %err, "could not persist best score; kept in memory");
            }
            info!(score, previous_best, "new best score");
        }

        let notifications = self.notifications_for(score, is_new_record, rank);
        AddScoreOutcome {
            is_new_record,
            rank,
            notifications,
        }
    }

    /// First `limit` entries of the board (at most its capacity).
    pub fn top_scores(&self, limit: usize) -> &[LeaderboardEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// Empty the board. The best score is tracked separately and stays untouched.
    pub fn reset_scores(&mut self) {
        self.entries.clear();
        if let Err(err) = self.store.clear() {
            warn!(key = self.store.key(), error = %err, "could not clear persisted leaderboard");
        }
        info!("leaderboard reset");
    }

    fn persist_entries(&self) {
        let entities: Vec<LeaderboardEntryEntity> =
            self.entries.iter().cloned().map(Into::into).collect();
        if let Err(err) = self.store.save_entries(&entities) {
            warn!(key = self.store.key(), error = %err, "could not persist leaderboard; kept in memory");
        }
    }

    fn notifications_for(
        &self,
        score: u32,
        is_new_record: bool,
        rank: Option<usize>,
    ) -> Vec<Notification> {
        if is_new_record {
            return vec![Notification {
                kind: NotificationKind::NewRecord,
                message: self
                    .translator
                    .translate_with("leaderboard.newRecord", &[("score", score.to_string())]),
            }];
        }

        rank.map(|rank| Notification {
            kind: NotificationKind::TopN,
            message: self
                .translator
                .translate_with("leaderboard.topRank", &[("rank", rank.to_string())]),
        })
        .into_iter()
        .collect()
    }
}

fn today() -> String {
    OffsetDateTime::now_utc().date().to_string()
}

impl From<LeaderboardEntryEntity> for LeaderboardEntry {
    fn from(value: LeaderboardEntryEntity) -> Self {
        Self {
            score: value.score,
            date: value.date,
            metadata: value.metadata,
        }
    }
}

impl From<LeaderboardEntry> for LeaderboardEntryEntity {
    fn from(value: LeaderboardEntry) -> Self {
        Self {
            score: value.score,
            date: value.date,
            metadata: value.metadata,
        }
    }
}
