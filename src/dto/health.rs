use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Number of clients attached to the public event stream.
    pub subscribers: usize,
}

impl HealthResponse {
    /// Storage is reachable.
    pub fn ok(subscribers: usize) -> Self {
        Self {
            status: "ok".to_string(),
            subscribers,
        }
    }

    /// Storage is failing; scores only live in memory.
    pub fn degraded(subscribers: usize) -> Self {
        Self {
            status: "degraded".to_string(),
            subscribers,
        }
    }
}
