use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::sequence::PlaybackStep;

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already formatted data field.
    pub fn new<E>(event: E, data: String) -> Self
    where
        E: Into<Option<String>>,
    {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast for every flash of the playback driver.
pub struct PresentColorEvent {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub step: PlaybackStep,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast once the whole sequence has been flashed.
pub struct PresentationFinishedEvent {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the pads start or stop accepting input.
pub struct InputEnabledEvent {
    pub session_id: Uuid,
    pub enabled: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Sound cue the client should play.
pub struct ToneEvent {
    /// `red`, `blue`, `green`, `yellow`, `success` or `failure`.
    pub tone: String,
    /// Oscillator frequency for color tones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_hz: Option<f32>,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after the display language changed.
pub struct LanguageChangedEvent {
    pub language: String,
}
