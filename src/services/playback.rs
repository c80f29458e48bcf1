//! Playback driver: flashes the sequence with real delays and closes the presentation.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;
use uuid::Uuid;

use crate::{
    services::{collaborators::Tone, game_service},
    state::{SharedState, sequence::Playback},
};

/// Cancel any running driver and, when the server paces playback, start a new one for
/// `session_id`.
///
/// A dispatch for a session that has since been replaced does nothing, so the live
/// session's driver is never cancelled by a late caller.
pub async fn dispatch(state: &SharedState, session_id: Uuid, playback: Playback) {
    let mut slot = state.playback_task().lock().await;
    let current = state.session().read().await.id();
    if current != session_id {
        debug!(session_id = %session_id, current = %current, "stale playback dispatch dropped");
        return;
    }

    if let Some(previous) = slot.take() {
        previous.abort();
        debug!(session_id = %session_id, "previous playback driver aborted");
    }

    if !state.config().server_paced_playback() {
        return;
    }

    let handle = tokio::spawn(drive(state.clone(), session_id, playback));
    *slot = Some(handle.abort_handle());
}

async fn drive(state: SharedState, session_id: Uuid, playback: Playback) {
    debug!(
        session_id = %session_id,
        round = playback.round(),
        steps = playback.len(),
        speed_ms = playback.speed_ms(),
        "playback started"
    );
    sleep(Duration::from_millis(playback.lead_in_ms().into())).await;

    for step in playback {
        {
            // A restart waits for this read guard, so no flash leaks from a replaced session.
            let session = state.session().read().await;
            if session.id() != session_id {
                debug!(session_id = %session_id, "session replaced; playback stopped");
                return;
            }
            state.presenter().present_color(session_id, step);
            state.audio().play_tone(Tone::Color(step.color));
        }
        sleep(Duration::from_millis(step.step_ms())).await;
    }

    let response = game_service::presentation_complete(&state, session_id).await;
    if !response.accepted {
        debug!(session_id = %session_id, "presentation end ignored by session");
    }
}
