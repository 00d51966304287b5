use axum::Json;
use shared::HealthResponse;

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::up())
}
