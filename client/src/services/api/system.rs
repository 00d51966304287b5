//! Server liveness.

use shared::dto::system::HealthResponse;

use crate::core::{ApiError, ApiService};

pub const HEALTH_URL: &str = "/api/health";

/// `GET /api/health`, uncached.
#[tracing::instrument(skip(api))]
pub async fn health(api: &dyn ApiService) -> Result<HealthResponse, ApiError> {
    let value = api.get_json(HEALTH_URL).await?;
    let health: HealthResponse = serde_json::from_value(value)?;
    tracing::debug!(status = %health.status, "Health check");
    Ok(health)
}
