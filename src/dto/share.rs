use serde::Serialize;
use utoipa::ToSchema;

/// Text handed to the platform share sheet or copied to the clipboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}
