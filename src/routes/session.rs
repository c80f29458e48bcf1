use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::{
        session::{
            InputResponse, RoundResponse, SessionEventRequest, SessionEventResponse,
            SessionSnapshot, SubmitColorRequest,
        },
        share::SharePayload,
    },
    error::AppError,
    services::{game_service, share_service},
    state::SharedState,
};

/// Routes driving the game session.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/session", get(get_session).post(start_session))
        .route(
            "/session/presentation-complete",
            post(presentation_complete),
        )
        .route("/session/input", post(submit_color))
        .route("/session/advance", post(advance_round))
        .route("/session/share", get(share))
}

#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    responses((status = 200, description = "Current session", body = SessionSnapshot))
)]
/// Return the current session snapshot.
pub async fn get_session(State(state): State<SharedState>) -> Json<SessionSnapshot> {
    Json(game_service::current_session(&state).await)
}

#[utoipa::path(
    post,
    path = "/session",
    tag = "session",
    responses((status = 200, description = "Session started", body = RoundResponse))
)]
/// Start a new session, cancelling the running one.
pub async fn start_session(State(state): State<SharedState>) -> Json<RoundResponse> {
    Json(game_service::start_session(&state).await)
}

#[utoipa::path(
    post,
    path = "/session/presentation-complete",
    tag = "session",
    request_body = SessionEventRequest,
    responses(
        (status = 200, description = "Input opened, or event ignored (`accepted: false`)", body = SessionEventResponse)
    )
)]
/// Signal that the sequence has been shown and input may begin.
pub async fn presentation_complete(
    State(state): State<SharedState>,
    Json(payload): Json<SessionEventRequest>,
) -> Json<SessionEventResponse> {
    Json(game_service::presentation_complete(&state, payload.session_id).await)
}

#[utoipa::path(
    post,
    path = "/session/input",
    tag = "session",
    request_body = SubmitColorRequest,
    responses(
        (status = 200, description = "Press evaluated", body = InputResponse),
        (status = 400, description = "Unknown color")
    )
)]
/// Submit one pad press.
pub async fn submit_color(
    State(state): State<SharedState>,
    Json(payload): Json<SubmitColorRequest>,
) -> Result<Json<InputResponse>, AppError> {
    payload.validate()?;
    let response = game_service::submit_color(&state, payload).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/session/advance",
    tag = "session",
    request_body = SessionEventRequest,
    responses(
        (status = 200, description = "Next round presenting, or event ignored (`accepted: false`)", body = RoundResponse)
    )
)]
/// Move on to the next round after a completed one.
pub async fn advance_round(
    State(state): State<SharedState>,
    Json(payload): Json<SessionEventRequest>,
) -> Json<RoundResponse> {
    Json(game_service::advance_round(&state, payload.session_id).await)
}

#[utoipa::path(
    get,
    path = "/session/share",
    tag = "session",
    responses((status = 200, description = "Share text for the current score", body = SharePayload))
)]
/// Return the share payload for the current score.
pub async fn share(State(state): State<SharedState>) -> Json<SharePayload> {
    Json(share_service::share_current(&state).await)
}
