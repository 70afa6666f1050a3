//! Health check handlers
//!
//! Endpoints for liveness and readiness checks.

use activity_service::dto::{HealthResponse, ReadinessResponse};
use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::state::AppState;

/// Basic health check (liveness)
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.config().app.name.clone()))
}

/// Readiness check with database health
///
/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let db_healthy = match activity_db::ping(state.service_context().pool()).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Readiness check: database unreachable");
            false
        }
    };

    let response = ReadinessResponse::ready(db_healthy);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
