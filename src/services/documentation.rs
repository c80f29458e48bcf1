use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Color Memory backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::session::get_session,
        crate::routes::session::start_session,
        crate::routes::session::presentation_complete,
        crate::routes::session::submit_color,
        crate::routes::session::advance_round,
        crate::routes::session::share,
        crate::routes::leaderboard::get_leaderboard,
        crate::routes::leaderboard::reset_leaderboard,
        crate::routes::leaderboard::get_best_score,
        crate::routes::leaderboard::reset_best_score,
        crate::routes::language::get_language,
        crate::routes::language::set_language,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::phase::VisibleGamePhase,
            crate::dto::session::SessionSnapshot,
            crate::dto::session::PlaybackPlan,
            crate::dto::session::RoundResponse,
            crate::dto::session::SessionEventRequest,
            crate::dto::session::SessionEventResponse,
            crate::dto::session::SubmitColorRequest,
            crate::dto::session::InputResult,
            crate::dto::session::InputResponse,
            crate::dto::session::GameOverResult,
            crate::dto::leaderboard::LeaderboardEntryDto,
            crate::dto::leaderboard::LeaderboardResponse,
            crate::dto::leaderboard::BestScoreResponse,
            crate::dto::leaderboard::NotificationDto,
            crate::dto::share::SharePayload,
            crate::dto::language::LanguageResponse,
            crate::dto::language::SetLanguageRequest,
            crate::dto::sse::PresentColorEvent,
            crate::dto::sse::PresentationFinishedEvent,
            crate::dto::sse::InputEnabledEvent,
            crate::dto::sse::ToneEvent,
            crate::dto::sse::LanguageChangedEvent,
            crate::state::sequence::Color,
            crate::state::sequence::PlaybackStep,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "session", description = "Game session lifecycle"),
        (name = "leaderboard", description = "Leaderboard and best score"),
        (name = "language", description = "Display language"),
    )
)]
pub struct ApiDoc;
