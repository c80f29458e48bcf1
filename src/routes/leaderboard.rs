use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use validator::Validate;

use crate::{
    dto::leaderboard::{BestScoreResponse, LeaderboardResponse, TopScoresQuery},
    error::AppError,
    services::leaderboard_service,
    state::SharedState,
};

/// Leaderboard and best score endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/leaderboard",
            get(get_leaderboard).delete(reset_leaderboard),
        )
        .route("/best-score", get(get_best_score).delete(reset_best_score))
}

#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "leaderboard",
    params(TopScoresQuery),
    responses(
        (status = 200, description = "Best scores", body = LeaderboardResponse),
        (status = 400, description = "Limit out of range")
    )
)]
/// Return the best scores, highest first.
pub async fn get_leaderboard(
    State(state): State<SharedState>,
    Query(query): Query<TopScoresQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    query.validate()?;
    Ok(Json(leaderboard_service::top_scores(&state, &query).await))
}

#[utoipa::path(
    delete,
    path = "/leaderboard",
    tag = "leaderboard",
    responses((status = 200, description = "Leaderboard emptied", body = LeaderboardResponse))
)]
/// Empty the leaderboard without touching the best score.
pub async fn reset_leaderboard(State(state): State<SharedState>) -> Json<LeaderboardResponse> {
    Json(leaderboard_service::reset_leaderboard(&state).await)
}

#[utoipa::path(
    get,
    path = "/best-score",
    tag = "leaderboard",
    responses((status = 200, description = "Stored best score", body = BestScoreResponse))
)]
/// Return the stored best score.
pub async fn get_best_score(State(state): State<SharedState>) -> Json<BestScoreResponse> {
    Json(leaderboard_service::best_score(&state))
}

#[utoipa::path(
    delete,
    path = "/best-score",
    tag = "leaderboard",
    responses(
        (status = 200, description = "Best score cleared", body = BestScoreResponse),
        (status = 503, description = "Storage unavailable")
    )
)]
/// Forget the best score without touching the leaderboard.
pub async fn reset_best_score(
    State(state): State<SharedState>,
) -> Result<Json<BestScoreResponse>, AppError> {
    Ok(Json(leaderboard_service::reset_best_score(&state)?))
}
