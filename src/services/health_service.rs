use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether storage is reachable; failures are logged by the state.
pub fn health_status(state: &SharedState) -> HealthResponse {
    let subscribers = state.public_sse().subscriber_count();
    if state.is_degraded() {
        HealthResponse::degraded(subscribers)
    } else {
        HealthResponse::ok(subscribers)
    }
}
