use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{dto::validation::validate_language, i18n::SUPPORTED_LANGUAGES};

/// Active display language and the ones a client may switch to.
#[derive(Debug, Serialize, ToSchema)]
pub struct LanguageResponse {
    pub language: String,
    pub supported: Vec<String>,
}

impl LanguageResponse {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            supported: SUPPORTED_LANGUAGES.iter().map(|lang| lang.to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
/// Switch the display language.
pub struct SetLanguageRequest {
    /// Language code such as `ko` or a locale such as `pt-BR`.
    #[validate(custom(function = "validate_language"))]
    pub language: String,
}
