//! Side-effect seams of the game: what the player sees and hears.
//!
//! The session only decides; these collaborators carry the decisions to clients. The
//! default implementation turns every call into an SSE event.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    dto::{session::SessionSnapshot, sse::ToneEvent},
    services::sse_events,
    state::{
        SseHub,
        sequence::{Color, PlaybackStep},
    },
};

/// Sound cue requested by the game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    /// Note associated with a pad, played on flashes and presses.
    Color(Color),
    /// Round completed.
    Success,
    /// Game over.
    Failure,
}

impl Tone {
    pub fn name(self) -> &'static str {
        match self {
            Tone::Color(color) => color.as_str(),
            Tone::Success => "success",
            Tone::Failure => "failure",
        }
    }

    /// Oscillator frequency for pad notes; effects are left to the client.
    pub fn frequency_hz(self) -> Option<f32> {
        match self {
            Tone::Color(color) => Some(color.tone_hz()),
            Tone::Success | Tone::Failure => None,
        }
    }
}

impl From<Tone> for ToneEvent {
    fn from(value: Tone) -> Self {
        Self {
            tone: value.name().to_string(),
            frequency_hz: value.frequency_hz(),
        }
    }
}

/// Visual side of the game.
pub trait Presenter: Send + Sync {
    /// Light one pad.
    fn present_color(&self, session_id: Uuid, step: PlaybackStep);
    /// The whole sequence has been shown.
    fn presentation_finished(&self, session_id: Uuid);
    /// Open or close the pads.
    fn set_input_enabled(&self, session_id: Uuid, enabled: bool);
    /// Render the session after a transition.
    fn phase_changed(&self, snapshot: &SessionSnapshot);
}

/// Audible side of the game.
pub trait AudioCue: Send + Sync {
    fn play_tone(&self, tone: Tone);
}

/// Presenter and audio cue publishing on the public SSE stream.
pub struct SseCollaborator {
    hub: Arc<SseHub>,
}

impl SseCollaborator {
    pub fn new(hub: Arc<SseHub>) -> Self {
        Self { hub }
    }
}

impl Presenter for SseCollaborator {
    fn present_color(&self, session_id: Uuid, step: PlaybackStep) {
        sse_events::broadcast_present_color(&self.hub, session_id, step);
    }

    fn presentation_finished(&self, session_id: Uuid) {
        sse_events::broadcast_presentation_finished(&self.hub, session_id);
    }

    fn set_input_enabled(&self, session_id: Uuid, enabled: bool) {
        sse_events::broadcast_input_enabled(&self.hub, session_id, enabled);
    }

    fn phase_changed(&self, snapshot: &SessionSnapshot) {
        sse_events::broadcast_phase_changed(&self.hub, snapshot);
    }
}

impl AudioCue for SseCollaborator {
    fn play_tone(&self, tone: Tone) {
        sse_events::broadcast_tone(&self.hub, &tone.into());
    }
}
