//! Health and readiness probes.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use sqlx::PgPool;
use std::time::Duration;

/// GET /health
///
/// Liveness probe: the process is up and serving requests.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /readyz
///
/// Readiness probe: the database answers a trivial query within a short
/// timeout. A slow or unreachable database marks the service not ready
/// instead of blocking the probe.
pub async fn readyz_handler(
    State(pool): State<PgPool>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let check = sqlx::query("SELECT 1").execute(&pool);

    match tokio::time::timeout(Duration::from_secs(2), check).await {
        Ok(Ok(_)) => Ok(Json(json!({ "status": "ready", "database": "ok" }))),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Readiness check failed: database error");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
        Err(_) => {
            tracing::warn!("Readiness check failed: database timeout");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
