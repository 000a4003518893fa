use crate::dto::HealthResponse;
use axum::Json;
use tracing::{debug, instrument};

/// Liveness only: answers as soon as the listener is up, whatever the state
/// of the upstream API.
#[instrument(name = "api_health_check")]
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse::OK)
}
