//! Weekly report handlers

use activity_service::dto::{
    CreateReportRequest, PaginatedResponse, ReportListQuery, ReportResponse,
    ReportSummaryResponse, UpdateReportRequest, WeekRangeQuery, WeeklyStatsResponse,
};
use activity_service::ReportService;
use axum::{extract::State, Json};

use crate::extractors::{CurrentUser, IdPath, Pagination, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Submit the caller's report for a week
///
/// POST /reports
pub async fn create_report(
    State(state): State<AppState>,
    CurrentUser(author): CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateReportRequest>,
) -> ApiResult<Created<Json<ReportResponse>>> {
    let service = ReportService::new(state.service_context());
    let response = service.create(&author, request).await?;
    Ok(Created(Json(response)))
}

/// GET /reports?user_id&week_iso&start_week&end_week&status&skip&limit
pub async fn list_reports(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    QueryParams(query): QueryParams<ReportListQuery>,
    Pagination(page): Pagination,
) -> ApiResult<Json<PaginatedResponse<ReportSummaryResponse>>> {
    let service = ReportService::new(state.service_context());
    let response = service.list(&requester, query, page).await?;
    Ok(Json(response))
}

/// GET /reports/stats/weekly?start_week&end_week
pub async fn weekly_stats(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<WeekRangeQuery>,
) -> ApiResult<Json<Vec<WeeklyStatsResponse>>> {
    let service = ReportService::new(state.service_context());
    let response = service.weekly_stats(query).await?;
    Ok(Json(response))
}

/// GET /reports/{id}
pub async fn get_report(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    IdPath(report_id): IdPath,
) -> ApiResult<Json<ReportResponse>> {
    let service = ReportService::new(state.service_context());
    let response = service.get(&requester, report_id).await?;
    Ok(Json(response))
}

/// PUT /reports/{id}
pub async fn update_report(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    IdPath(report_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateReportRequest>,
) -> ApiResult<Json<ReportResponse>> {
    let service = ReportService::new(state.service_context());
    let response = service.update(&requester, report_id, request).await?;
    Ok(Json(response))
}

/// DELETE /reports/{id}
pub async fn delete_report(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    IdPath(report_id): IdPath,
) -> ApiResult<NoContent> {
    let service = ReportService::new(state.service_context());
    service.delete(&requester, report_id).await?;
    Ok(NoContent)
}

/// PATCH /reports/{id}/review
pub async fn review_report(
    State(state): State<AppState>,
    CurrentUser(reviewer): CurrentUser,
    IdPath(report_id): IdPath,
) -> ApiResult<Json<ReportResponse>> {
    let service = ReportService::new(state.service_context());
    let response = service.review(&reviewer, report_id).await?;
    Ok(Json(response))
}
