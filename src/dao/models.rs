use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Leaderboard entry as persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntryEntity {
    /// Final score of the session.
    pub score: u32,
    /// Calendar date label (`YYYY-MM-DD`) the score was recorded on.
    pub date: String,
    /// Auxiliary fields attached by the caller (level reached, play count...).
    #[serde(default)]
    pub metadata: IndexMap<String, Value>,
}

/// Best score as persisted by the storage layer.
///
/// Older front ends stored the value as a decimal string, newer ones as a JSON number;
/// both shapes are accepted on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum BestScoreEntity {
    Number(u32),
    Text(String),
}
