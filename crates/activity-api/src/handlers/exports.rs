//! Export handlers
//!
//! Each endpoint renders a file in memory and sends it as an attachment.

use activity_service::dto::{MessageExportQuery, ReportExportQuery, UserListQuery};
use activity_service::ExportService;
use axum::extract::State;

use crate::extractors::{PathParam, QueryParams};
use crate::response::{ApiResult, FileDownload};
use crate::state::AppState;

/// GET /exports/reports/csv?start_week&end_week&user_id&include_tasks_detail
pub async fn reports_csv(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ReportExportQuery>,
) -> ApiResult<FileDownload> {
    let service = ExportService::new(state.service_context());
    Ok(FileDownload(service.reports_csv(query).await?))
}

/// GET /exports/reports/pdf?start_week&end_week&user_id
pub async fn reports_pdf(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ReportExportQuery>,
) -> ApiResult<FileDownload> {
    let service = ExportService::new(state.service_context());
    Ok(FileDownload(service.reports_pdf(query).await?))
}

/// GET /exports/users/csv?role&status
pub async fn users_csv(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<UserListQuery>,
) -> ApiResult<FileDownload> {
    let service = ExportService::new(state.service_context());
    Ok(FileDownload(service.users_csv(query).await?))
}

/// GET /exports/users/pdf?role&status
pub async fn users_pdf(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<UserListQuery>,
) -> ApiResult<FileDownload> {
    let service = ExportService::new(state.service_context());
    Ok(FileDownload(service.users_pdf(query).await?))
}

/// GET /exports/messages/csv?start_date&end_date&sender_id&receiver_id
pub async fn messages_csv(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<MessageExportQuery>,
) -> ApiResult<FileDownload> {
    let service = ExportService::new(state.service_context());
    Ok(FileDownload(service.messages_csv(query).await?))
}

/// GET /exports/weekly-summary/{week_iso}/pdf
pub async fn weekly_summary_pdf(
    State(state): State<AppState>,
    PathParam(week_iso): PathParam<String>,
) -> ApiResult<FileDownload> {
    let service = ExportService::new(state.service_context());
    Ok(FileDownload(service.weekly_summary_pdf(&week_iso).await?))
}
