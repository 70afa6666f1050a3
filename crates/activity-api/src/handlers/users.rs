//! User administration handlers

use activity_service::dto::{
    CreateUserRequest, PaginatedResponse, UpdateUserRequest, UserListQuery, UserResponse,
};
use activity_service::UserService;
use axum::{extract::State, Json};

use crate::extractors::{CurrentUser, IdPath, Pagination, QueryParams, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// GET /users?role&status&skip&limit
pub async fn list_users(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<UserListQuery>,
    Pagination(page): Pagination,
) -> ApiResult<Json<PaginatedResponse<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.list(query, page).await?;
    Ok(Json(response))
}

/// Active employees, for picking message recipients
///
/// GET /users/employees
pub async fn list_employees(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.employees().await?;
    Ok(Json(response))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.create(request).await?;
    Ok(Created(Json(response)))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get(user_id).await?;
    Ok(Json(response))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(user_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update(&actor, user_id, request).await?;
    Ok(Json(response))
}

/// Deactivates; accounts are never removed
///
/// DELETE /users/{id}
pub async fn deactivate_user(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    IdPath(user_id): IdPath,
) -> ApiResult<NoContent> {
    let service = UserService::new(state.service_context());
    service.deactivate(&actor, user_id).await?;
    Ok(NoContent)
}
