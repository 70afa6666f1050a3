//! Authentication extractor
//!
//! Resolves the caller's identity from the bearer token. Behind the
//! operation guard the identity is already in the request extensions.

use activity_common::JwtService;
use activity_core::Identity;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use tracing::warn;

use crate::response::ApiError;
use crate::state::AppState;

/// Validate the `Authorization: Bearer` header and return its identity
pub fn bearer_identity(headers: &HeaderMap, jwt: &JwtService) -> Result<Identity, ApiError> {
    let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() else {
        return Err(if headers.contains_key(header::AUTHORIZATION) {
            ApiError::InvalidAuthFormat
        } else {
            ApiError::MissingAuth
        });
    };

    jwt.authenticate(bearer.token()).map_err(|e| {
        warn!(error = %e, "Invalid access token");
        ApiError::App(e)
    })
}

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(CurrentUser(identity.clone()));
        }

        let app_state = AppState::from_ref(state);
        bearer_identity(&parts.headers, app_state.jwt_service()).map(CurrentUser)
    }
}
