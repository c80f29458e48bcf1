use tracing::warn;

use crate::{
    dto::language::{LanguageResponse, SetLanguageRequest},
    error::ServiceError,
    services::sse_events,
    state::SharedState,
};

pub fn current_language(state: &SharedState) -> LanguageResponse {
    LanguageResponse::new(state.localizer().language())
}

/// Switch the display language and remember the choice.
///
/// The switch holds even when the choice cannot be persisted.
pub fn set_language(
    state: &SharedState,
    request: &SetLanguageRequest,
) -> Result<LanguageResponse, ServiceError> {
    let language = state.localizer().switch(&request.language)?;
    if let Err(err) = state.languages().save_language(&language) {
        warn!(
            language = %language,
            error = %err,
            "failed to persist language; kept in memory only"
        );
    }

    sse_events::broadcast_language_changed(state.public_sse(), &language);
    Ok(LanguageResponse::new(language))
}
