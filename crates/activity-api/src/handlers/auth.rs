//! Authentication handlers
//!
//! Endpoints for login, token refresh and the current profile.

use activity_service::dto::{AuthResponse, LoginRequest, RefreshTokenRequest, UserResponse};
use activity_service::AuthService;
use axum::{extract::State, Json};

use crate::extractors::{CurrentUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Exchange a refresh token for a new pair
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.refresh(request).await?;
    Ok(Json(response))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> ApiResult<Json<UserResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.current_user(&identity).await?;
    Ok(Json(response))
}
