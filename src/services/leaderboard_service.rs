use tracing::{info, warn};

use crate::{
    dto::leaderboard::{
        BestScoreResponse, LeaderboardEntryDto, LeaderboardResponse, TopScoresQuery,
    },
    error::ServiceError,
    services::sse_events,
    state::SharedState,
};

/// Best entries of the board, at most `query.limit`.
pub async fn top_scores(state: &SharedState, query: &TopScoresQuery) -> LeaderboardResponse {
    let leaderboard = state.leaderboard().lock().await;
    LeaderboardResponse {
        capacity: leaderboard.capacity(),
        entries: LeaderboardEntryDto::ranked(leaderboard.top_scores(query.limit)),
    }
}

/// Empty the board. The best score is kept.
pub async fn reset_leaderboard(state: &SharedState) -> LeaderboardResponse {
    let response = {
        let mut leaderboard = state.leaderboard().lock().await;
        leaderboard.reset_scores();
        LeaderboardResponse {
            capacity: leaderboard.capacity(),
            entries: Vec::new(),
        }
    };
    sse_events::broadcast_leaderboard_updated(state.public_sse(), &response);
    response
}

pub fn best_score(state: &SharedState) -> BestScoreResponse {
    BestScoreResponse {
        best_score: state.scores().best_score(),
    }
}

/// Forget the best score. The board is kept.
pub fn reset_best_score(state: &SharedState) -> Result<BestScoreResponse, ServiceError> {
    if let Err(err) = state.scores().reset() {
        warn!(error = %err, "failed to clear persisted best score");
        return Err(err.into());
    }
    info!("best score reset");
    Ok(BestScoreResponse { best_score: 0 })
}
