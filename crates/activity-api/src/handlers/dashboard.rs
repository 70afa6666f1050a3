//! Dashboard handler

use activity_service::dto::DashboardResponse;
use activity_service::DashboardService;
use axum::{extract::State, Json};

use crate::extractors::CurrentUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Role-scoped counters and the latest activity
///
/// GET /dashboard/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
) -> ApiResult<Json<DashboardResponse>> {
    let service = DashboardService::new(state.service_context());
    let response = service.stats(&requester).await?;
    Ok(Json(response))
}
