use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::state::leaderboard::{EntryMetadata, LeaderboardEntry, Notification};

const DEFAULT_TOP_LIMIT: usize = 5;

fn default_limit() -> usize {
    DEFAULT_TOP_LIMIT
}

/// Query accepted by `GET /leaderboard`.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopScoresQuery {
    /// Number of entries to return (1-100, defaults to 5).
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: usize,
}

impl Default for TopScoresQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TOP_LIMIT,
        }
    }
}

/// One ranked row of the leaderboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntryDto {
    /// 1-based position.
    pub rank: usize,
    pub score: u32,
    /// Calendar date of the game (`YYYY-MM-DD`).
    pub date: String,
    #[schema(value_type = Object)]
    pub metadata: EntryMetadata,
}

impl LeaderboardEntryDto {
    /// Number the given entries from 1.
    pub fn ranked(entries: &[LeaderboardEntry]) -> Vec<Self> {
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Self {
                rank: index + 1,
                score: entry.score,
                date: entry.date.clone(),
                metadata: entry.metadata.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Top of the board, also broadcast as `leaderboard.updated`.
pub struct LeaderboardResponse {
    pub capacity: usize,
    pub entries: Vec<LeaderboardEntryDto>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Stored best score.
pub struct BestScoreResponse {
    pub best_score: u32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
/// Rendered leaderboard notification, also broadcast as `leaderboard.notification`.
pub struct NotificationDto {
    /// `new-record` or `top-n`.
    pub kind: String,
    pub message: String,
}

impl From<&Notification> for NotificationDto {
    fn from(value: &Notification) -> Self {
        Self {
            kind: value.kind.as_str().to_string(),
            message: value.message.clone(),
        }
    }
}

/// Build the metadata stored with a finished game.
pub fn game_metadata(level: u32, play_count: u32) -> EntryMetadata {
    let mut metadata = EntryMetadata::new();
    metadata.insert("level".into(), Value::from(level));
    metadata.insert("play_count".into(), Value::from(play_count));
    metadata
}
