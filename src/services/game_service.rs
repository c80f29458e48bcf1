use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::{
        leaderboard::{LeaderboardEntryDto, LeaderboardResponse, NotificationDto, game_metadata},
        session::{
            GameOverResult, InputResponse, InputResult, PlaybackPlan, RoundResponse,
            SessionEventResponse, SessionSnapshot, SubmitColorRequest,
        },
    },
    error::ServiceError,
    services::{collaborators::Tone, playback, sse_events},
    state::{
        SharedState,
        game::{GameSession, InputOutcome, SessionError},
        sequence::{Color, ParseColorError, Playback},
    },
};

/// Entries listed on the game-over screen.
const TOP_SCORES_SHOWN: usize = 5;

/// Snapshot of the session as it stands.
pub async fn current_session(state: &SharedState) -> SessionSnapshot {
    let session = state.session().read().await;
    SessionSnapshot::from_session(&session, state.translator())
}

/// Start a fresh session, cancelling whatever was running.
pub async fn start_session(state: &SharedState) -> RoundResponse {
    let (snapshot, plan) = {
        let mut session = state.session().write().await;
        let plan = session.start();
        (snapshot_of(state, &session), plan)
    };
    info!(session_id = %snapshot.session_id, "session started");

    present_round(state, snapshot, plan).await
}

/// The sequence has been shown: open input.
///
/// Events for a restarted session, or arriving outside `Presenting`, are ignored and
/// report `accepted: false`.
pub async fn presentation_complete(state: &SharedState, session_id: Uuid) -> SessionEventResponse {
    let mut session = state.session().write().await;
    if let Err(err) = session.on_presentation_complete(session_id) {
        return SessionEventResponse {
            accepted: false,
            snapshot: reject(state, &session, err),
        };
    }
    let snapshot = snapshot_of(state, &session);
    drop(session);

    let presenter = state.presenter();
    presenter.presentation_finished(session_id);
    presenter.set_input_enabled(session_id, true);
    presenter.phase_changed(&snapshot);

    SessionEventResponse {
        accepted: true,
        snapshot,
    }
}

/// Check one pad press. A wrong color ends the session and records the score.
pub async fn submit_color(
    state: &SharedState,
    request: SubmitColorRequest,
) -> Result<InputResponse, ServiceError> {
    let color: Color = request
        .color
        .parse()
        .map_err(|err: ParseColorError| ServiceError::InvalidInput(err.to_string()))?;
    let session_id = request.session_id;

    let mut session = state.session().write().await;
    let outcome = match session.submit_color(session_id, color) {
        Ok(outcome) => outcome,
        Err(err) => {
            return Ok(InputResponse {
                result: InputResult::Ignored,
                remaining: None,
                snapshot: reject(state, &session, err),
                game_over: None,
            });
        }
    };
    let snapshot = snapshot_of(state, &session);
    let level = session.level();
    let play_count = session.play_count();
    drop(session);

    state.audio().play_tone(Tone::Color(color));

    let response = match outcome {
        InputOutcome::Continue { remaining } => InputResponse {
            result: InputResult::Continue,
            remaining: Some(remaining),
            snapshot,
            game_over: None,
        },
        InputOutcome::RoundComplete => {
            debug!(session_id = %session_id, round = snapshot.round, "round complete");
            state.audio().play_tone(Tone::Success);
            close_input(state, &snapshot);
            InputResponse {
                result: InputResult::RoundComplete,
                remaining: Some(0),
                snapshot,
                game_over: None,
            }
        }
        InputOutcome::GameOver { final_score } => {
            state.audio().play_tone(Tone::Failure);
            close_input(state, &snapshot);
            let game_over = finish_session(state, final_score, level, play_count).await;
            info!(
                session_id = %session_id,
                final_score,
                rank = ?game_over.rank,
                new_record = game_over.is_new_record,
                "game over"
            );
            InputResponse {
                result: InputResult::GameOver,
                remaining: None,
                snapshot,
                game_over: Some(game_over),
            }
        }
    };
    Ok(response)
}

/// Grow the sequence after a completed round and present it.
pub async fn advance_round(state: &SharedState, session_id: Uuid) -> RoundResponse {
    let (snapshot, plan) = {
        let mut session = state.session().write().await;
        match session.advance_round(session_id) {
            Ok(plan) => (snapshot_of(state, &session), plan),
            Err(err) => {
                return RoundResponse {
                    accepted: false,
                    snapshot: reject(state, &session, err),
                    playback: None,
                };
            }
        }
    };
    debug!(
        session_id = %session_id,
        round = snapshot.round,
        speed_ms = snapshot.speed_ms,
        "round advanced"
    );

    present_round(state, snapshot, plan).await
}

/// Announce a presenting round and hand its plan to the playback driver.
async fn present_round(
    state: &SharedState,
    snapshot: SessionSnapshot,
    plan: Playback,
) -> RoundResponse {
    let presenter = state.presenter();
    presenter.set_input_enabled(snapshot.session_id, false);
    presenter.phase_changed(&snapshot);

    playback::dispatch(state, snapshot.session_id, plan.clone()).await;

    RoundResponse {
        accepted: true,
        playback: Some(PlaybackPlan::new(
            plan,
            state.config().server_paced_playback(),
        )),
        snapshot,
    }
}

/// Record the final score and publish the refreshed board.
async fn finish_session(
    state: &SharedState,
    final_score: u32,
    level: u32,
    play_count: u32,
) -> GameOverResult {
    let (outcome, best_score, board, top_scores) = {
        let mut leaderboard = state.leaderboard().lock().await;
        let outcome = leaderboard.add_score(final_score, game_metadata(level, play_count));
        let board = LeaderboardResponse {
            capacity: leaderboard.capacity(),
            entries: LeaderboardEntryDto::ranked(leaderboard.entries()),
        };
        let top_scores = LeaderboardEntryDto::ranked(leaderboard.top_scores(TOP_SCORES_SHOWN));
        (outcome, leaderboard.best_score(), board, top_scores)
    };

    let notifications: Vec<NotificationDto> =
        outcome.notifications.iter().map(NotificationDto::from).collect();
    let hub = state.public_sse();
    for notification in &notifications {
        sse_events::broadcast_notification(hub, notification);
    }
    sse_events::broadcast_leaderboard_updated(hub, &board);

    GameOverResult {
        final_score,
        best_score,
        level,
        is_new_record: outcome.is_new_record,
        rank: outcome.rank,
        notifications,
        top_scores,
    }
}

fn close_input(state: &SharedState, snapshot: &SessionSnapshot) {
    let presenter = state.presenter();
    presenter.set_input_enabled(snapshot.session_id, false);
    presenter.phase_changed(snapshot);
}

fn snapshot_of(state: &SharedState, session: &GameSession) -> SessionSnapshot {
    SessionSnapshot::from_session(session, state.translator())
}

/// Log a refused event and return the unchanged session.
fn reject(state: &SharedState, session: &GameSession, err: SessionError) -> SessionSnapshot {
    match err {
        SessionError::StaleSession { current, got } => {
            debug!(current = %current, got = %got, "ignoring event for stale session");
        }
        SessionError::InvalidTransition(invalid) => {
            warn!(
                from = ?invalid.from,
                event = ?invalid.event,
                "ignoring out-of-phase session event"
            );
        }
    }
    snapshot_of(state, session)
}
