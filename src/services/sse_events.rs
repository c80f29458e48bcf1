use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        leaderboard::{LeaderboardResponse, NotificationDto},
        session::SessionSnapshot,
        sse::{
            InputEnabledEvent, LanguageChangedEvent, PresentColorEvent,
            PresentationFinishedEvent, ServerEvent, ToneEvent,
        },
    },
    state::{SseHub, sequence::PlaybackStep},
};

const EVENT_PHASE_CHANGED: &str = "session.phase_changed";
const EVENT_PRESENT_COLOR: &str = "session.present_color";
const EVENT_PRESENTATION_FINISHED: &str = "session.presentation_finished";
const EVENT_INPUT_ENABLED: &str = "session.input_enabled";
const EVENT_TONE: &str = "audio.tone";
const EVENT_LEADERBOARD_UPDATED: &str = "leaderboard.updated";
const EVENT_LEADERBOARD_NOTIFICATION: &str = "leaderboard.notification";
const EVENT_LANGUAGE_CHANGED: &str = "i18n.language_changed";
const EVENT_INFO: &str = "info";

/// Broadcast a session snapshot after a phase change.
pub fn broadcast_phase_changed(hub: &SseHub, snapshot: &SessionSnapshot) {
    send_public_event(hub, EVENT_PHASE_CHANGED, snapshot);
}

/// Broadcast one flash of the playback.
pub fn broadcast_present_color(hub: &SseHub, session_id: Uuid, step: PlaybackStep) {
    let payload = PresentColorEvent { session_id, step };
    send_public_event(hub, EVENT_PRESENT_COLOR, &payload);
}

/// Broadcast the end of the playback.
pub fn broadcast_presentation_finished(hub: &SseHub, session_id: Uuid) {
    let payload = PresentationFinishedEvent { session_id };
    send_public_event(hub, EVENT_PRESENTATION_FINISHED, &payload);
}

/// Broadcast whether the pads accept input.
pub fn broadcast_input_enabled(hub: &SseHub, session_id: Uuid, enabled: bool) {
    let payload = InputEnabledEvent {
        session_id,
        enabled,
    };
    send_public_event(hub, EVENT_INPUT_ENABLED, &payload);
}

/// Broadcast a sound cue.
pub fn broadcast_tone(hub: &SseHub, tone: &ToneEvent) {
    send_public_event(hub, EVENT_TONE, tone);
}

/// Broadcast the refreshed top of the board.
pub fn broadcast_leaderboard_updated(hub: &SseHub, leaderboard: &LeaderboardResponse) {
    send_public_event(hub, EVENT_LEADERBOARD_UPDATED, leaderboard);
}

/// Broadcast a rendered leaderboard notification.
pub fn broadcast_notification(hub: &SseHub, notification: &NotificationDto) {
    send_public_event(hub, EVENT_LEADERBOARD_NOTIFICATION, notification);
}

/// Broadcast the new display language so clients re-render their texts.
pub fn broadcast_language_changed(hub: &SseHub, language: &str) {
    let payload = LanguageChangedEvent {
        language: language.to_string(),
    };
    send_public_event(hub, EVENT_LANGUAGE_CHANGED, &payload);
}

/// Send a human-readable info message onto the public SSE stream.
pub fn broadcast_public_info(hub: &SseHub, message: &str) {
    hub.broadcast(ServerEvent::new(
        Some(EVENT_INFO.to_string()),
        message.to_string(),
    ));
}

fn send_public_event(hub: &SseHub, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::sequence::Color;

    #[test]
    fn present_color_flattens_step() {
        let hub = SseHub::new(4);
        let mut receiver = hub.subscribe();
        let session_id = Uuid::new_v4();

        broadcast_present_color(
            &hub,
            session_id,
            PlaybackStep {
                index: 0,
                color: Color::Green,
                flash_ms: 600,
                gap_ms: 600,
            },
        );

        let event = receiver.try_recv().unwrap();
        assert_eq!(event.event.as_deref(), Some("session.present_color"));
        let data: serde_json::Value = serde_json::from_str(&event.data).unwrap();
        assert_eq!(data["color"], "green");
        assert_eq!(data["flash_ms"], 600);
        assert_eq!(data["session_id"], session_id.to_string());
    }

    #[test]
    fn info_is_sent_as_plain_text() {
        let hub = SseHub::new(4);
        let mut receiver = hub.subscribe();
        broadcast_public_info(&hub, "hello");
        let event = receiver.try_recv().unwrap();
        assert_eq!(event.event.as_deref(), Some("info"));
        assert_eq!(event.data, "hello");
    }
}
