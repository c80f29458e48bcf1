use crate::{
    dto::share::SharePayload,
    i18n::Translate,
    state::{SharedState, sequence::level_for_round},
};

/// Share payload for the score of the current session.
pub async fn share_current(state: &SharedState) -> SharePayload {
    let score = state.session().read().await.score();
    build_share_payload(state.translator(), score, state.config().share_url())
}

/// Render the share text for `score`. The level shown is the one reached with that many
/// completed rounds, never below 1.
pub fn build_share_payload(translator: &dyn Translate, score: u32, url: &str) -> SharePayload {
    let level = level_for_round(score);
    SharePayload {
        title: translator.translate("share.title"),
        text: translator.translate_with(
            "share.text",
            &[("score", score.to_string()), ("level", level.to_string())],
        ),
        url: url.to_string(),
    }
}
