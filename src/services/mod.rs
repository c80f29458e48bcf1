/// Presenter and audio seams of the game.
pub mod collaborators;
/// OpenAPI documentation generation.
pub mod documentation;
/// Session lifecycle: start, presentation, input and rounds.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Display language switching.
pub mod language_service;
/// Leaderboard and best score operations.
pub mod leaderboard_service;
/// Server-paced playback driver.
pub mod playback;
/// Share text rendering.
pub mod share_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
