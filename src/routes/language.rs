use axum::{Json, Router, extract::State, routing::get};
use validator::Validate;

use crate::{
    dto::language::{LanguageResponse, SetLanguageRequest},
    error::AppError,
    services::language_service,
    state::SharedState,
};

/// Display language endpoints.
pub fn router() -> Router<SharedState> {
    Router::new().route("/language", get(get_language).put(set_language))
}

#[utoipa::path(
    get,
    path = "/language",
    tag = "language",
    responses((status = 200, description = "Active and supported languages", body = LanguageResponse))
)]
/// Return the active display language.
pub async fn get_language(State(state): State<SharedState>) -> Json<LanguageResponse> {
    Json(language_service::current_language(&state))
}

#[utoipa::path(
    put,
    path = "/language",
    tag = "language",
    request_body = SetLanguageRequest,
    responses(
        (status = 200, description = "Language switched", body = LanguageResponse),
        (status = 400, description = "Unsupported language")
    )
)]
/// Switch the display language for every translated text the server produces.
pub async fn set_language(
    State(state): State<SharedState>,
    Json(payload): Json<SetLanguageRequest>,
) -> Result<Json<LanguageResponse>, AppError> {
    payload.validate()?;
    Ok(Json(language_service::set_language(&state, &payload)?))
}
