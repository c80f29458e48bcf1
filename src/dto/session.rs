use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        leaderboard::{LeaderboardEntryDto, NotificationDto},
        phase::VisibleGamePhase,
        validation::validate_color,
    },
    i18n::Translate,
    state::{
        game::GameSession,
        sequence::{Playback, PlaybackStep},
    },
};

/// Public view of the current session.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub phase: VisibleGamePhase,
    pub round: u32,
    /// Completed rounds so far.
    pub score: u32,
    pub level: u32,
    /// Flash duration of the current round.
    pub speed_ms: u32,
    pub sequence_length: usize,
    /// Colors already entered this round.
    pub input_progress: usize,
    /// Translated status line.
    pub status_text: String,
    pub version: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<u32>,
}

impl SessionSnapshot {
    pub fn from_session(session: &GameSession, translator: &dyn Translate) -> Self {
        let machine = session.snapshot();
        let phase = VisibleGamePhase::from(&machine.phase);
        Self {
            session_id: session.id(),
            phase,
            round: session.round(),
            score: session.score(),
            level: session.level(),
            speed_ms: session.speed_ms(),
            sequence_length: session.sequence().len(),
            input_progress: session.user_input().len(),
            status_text: translator.translate(phase.status_key()),
            version: machine.version,
            final_score: session.final_score(),
        }
    }
}

/// Flashes to show for one round.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaybackPlan {
    pub round: u32,
    pub speed_ms: u32,
    pub lead_in_ms: u32,
    pub total_duration_ms: u64,
    /// Whether the server drives the flashes and closes the presentation itself.
    pub server_paced: bool,
    pub steps: Vec<PlaybackStep>,
}

impl PlaybackPlan {
    pub fn new(playback: Playback, server_paced: bool) -> Self {
        Self {
            round: playback.round(),
            speed_ms: playback.speed_ms(),
            lead_in_ms: playback.lead_in_ms(),
            total_duration_ms: playback.total_duration_ms(),
            server_paced,
            steps: playback.collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Returned when a round starts presenting.
pub struct RoundResponse {
    /// `false` when the event was ignored because the session was restarted.
    pub accepted: bool,
    pub snapshot: SessionSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback: Option<PlaybackPlan>,
}

#[derive(Debug, Deserialize, ToSchema)]
/// Event addressed to a specific session.
pub struct SessionEventRequest {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
/// Result of an event that may have targeted a stale session.
pub struct SessionEventResponse {
    /// `false` when the event was ignored because the session was restarted.
    pub accepted: bool,
    pub snapshot: SessionSnapshot,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
/// A pad press.
pub struct SubmitColorRequest {
    pub session_id: Uuid,
    /// Color name or its `1`-`4` key.
    #[validate(custom(function = "validate_color"))]
    pub color: String,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
/// What a pad press did.
pub enum InputResult {
    /// Correct; more colors expected.
    Continue,
    /// Correct and complete; call `/session/advance`.
    RoundComplete,
    /// Wrong color.
    GameOver,
    /// Press addressed to a restarted session.
    Ignored,
}

#[derive(Debug, Serialize, ToSchema)]
/// Response to `POST /session/input`.
pub struct InputResponse {
    pub result: InputResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<usize>,
    pub snapshot: SessionSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_over: Option<GameOverResult>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
/// Everything the game-over screen shows.
pub struct GameOverResult {
    pub final_score: u32,
    pub best_score: u32,
    pub level: u32,
    pub is_new_record: bool,
    /// 1-based leaderboard position, absent when the score did not make the board.
    pub rank: Option<usize>,
    pub notifications: Vec<NotificationDto>,
    pub top_scores: Vec<LeaderboardEntryDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        i18n::Catalog,
        state::{game::DEFAULT_LEAD_IN_MS, sequence::Palette},
    };

    #[test]
    fn snapshot_reflects_session() {
        let mut session = GameSession::seeded(Palette::default(), DEFAULT_LEAD_IN_MS, 7);
        session.start();
        let snapshot = SessionSnapshot::from_session(&session, &Catalog::builtin());

        assert_eq!(snapshot.phase, VisibleGamePhase::Presenting);
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.sequence_length, 1);
        assert_eq!(snapshot.status_text, "Watch the sequence...");
        assert_eq!(snapshot.final_score, None);
    }

    #[test]
    fn plan_lists_every_step() {
        let mut session = GameSession::seeded(Palette::default(), 250, 7);
        let plan = PlaybackPlan::new(session.start(), true);
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.lead_in_ms, 250);
        assert_eq!(plan.total_duration_ms, 250 + 1200);
    }

    #[test]
    fn submit_color_request_validates_color() {
        let valid = SubmitColorRequest {
            session_id: Uuid::new_v4(),
            color: "blue".into(),
        };
        assert!(valid.validate().is_ok());

        let invalid = SubmitColorRequest {
            session_id: Uuid::new_v4(),
            color: "purple".into(),
        };
        let errors = invalid.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("color"));
    }
}
