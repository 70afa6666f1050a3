//! Report comment handlers

use activity_service::dto::{
    CommentListQuery, CommentResponse, CreateCommentRequest, UpdateCommentRequest,
};
use activity_service::CommentService;
use axum::{extract::State, Json};

use crate::extractors::{CurrentUser, IdPath, Pagination, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// POST /comments
pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<Created<Json<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let response = service.add(&admin, request).await?;
    Ok(Created(Json(response)))
}

/// GET /comments?report_id&skip&limit
pub async fn list_comments(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<CommentListQuery>,
    Pagination(page): Pagination,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let response = service.list_all(query, page).await?;
    Ok(Json(response))
}

/// GET /comments/report/{id}
pub async fn list_report_comments(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    IdPath(report_id): IdPath,
) -> ApiResult<Json<Vec<CommentResponse>>> {
    let service = CommentService::new(state.service_context());
    let response = service.list_for_report(&requester, report_id).await?;
    Ok(Json(response))
}

/// GET /comments/{id}
pub async fn get_comment(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    IdPath(comment_id): IdPath,
) -> ApiResult<Json<CommentResponse>> {
    let service = CommentService::new(state.service_context());
    let response = service.get(&requester, comment_id).await?;
    Ok(Json(response))
}

/// PUT /comments/{id}
pub async fn update_comment(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    IdPath(comment_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateCommentRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let service = CommentService::new(state.service_context());
    let response = service.update(&admin, comment_id, request).await?;
    Ok(Json(response))
}

/// DELETE /comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    IdPath(comment_id): IdPath,
) -> ApiResult<NoContent> {
    let service = CommentService::new(state.service_context());
    service.delete(&admin, comment_id).await?;
    Ok(NoContent)
}
