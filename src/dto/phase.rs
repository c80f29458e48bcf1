use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::GamePhase;

/// Publicly visible game phase exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleGamePhase {
    /// No session started yet.
    Idle,
    /// The sequence is being flashed.
    Presenting,
    /// Waiting for the player to repeat the sequence.
    AwaitingInput,
    /// Round won; waiting for the next one.
    RoundComplete,
    /// Game over.
    Ended,
}

impl VisibleGamePhase {
    /// Translation key of the status line shown for this phase.
    pub fn status_key(self) -> &'static str {
        match self {
            VisibleGamePhase::Idle => "game.ready",
            VisibleGamePhase::Presenting => "game.watching",
            VisibleGamePhase::AwaitingInput => "game.yourTurn",
            VisibleGamePhase::RoundComplete => "game.success",
            VisibleGamePhase::Ended => "game.over",
        }
    }
}

impl From<&GamePhase> for VisibleGamePhase {
    fn from(value: &GamePhase) -> Self {
        match value {
            GamePhase::Idle => VisibleGamePhase::Idle,
            GamePhase::Presenting => VisibleGamePhase::Presenting,
            GamePhase::AwaitingInput => VisibleGamePhase::AwaitingInput,
            GamePhase::RoundComplete => VisibleGamePhase::RoundComplete,
            GamePhase::Ended => VisibleGamePhase::Ended,
        }
    }
}
