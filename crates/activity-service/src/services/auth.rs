//! Authentication service
//!
//! Handles login, token refresh and the current-user lookup. Tokens are
//! stateless; nothing is stored server-side.

use activity_common::{AppError, TokenPair};
use activity_core::{Identity, User};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::dto::{AuthResponse, LoginRequest, RefreshTokenRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let email = User::normalize_email(&request.email);

        let user = self
            .ctx
            .user_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!(email = %email, "Login failed: user not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        if !self
            .ctx
            .password_service()
            .verify(&request.password, &password_hash)?
        {
            warn!(user_id = %user.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        // Only a caller holding the right password learns the account is inactive
        if !user.is_active() {
            warn!(user_id = %user.id, "Login refused: account inactive");
            return Err(ServiceError::App(AppError::AccountInactive));
        }

        let now = Utc::now();
        self.ctx.user_repo().record_login(user.id, now).await?;

        info!(user_id = %user.id, role = %user.role, "User logged in successfully");

        let user = User {
            last_login_at: Some(now),
            ..user
        };
        self.issue(&user)
    }

    /// Exchange a refresh token for a new token pair
    #[instrument(skip(self, request))]
    pub async fn refresh(&self, request: RefreshTokenRequest) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)?;
        let user_id = claims.user_id()?;

        // Reload so role changes and deactivation take effect
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Refresh failed: user no longer exists");
                ServiceError::App(AppError::InvalidSignature)
            })?;

        if !user.is_active() {
            warn!(user_id = %user.id, "Refresh refused: account inactive");
            return Err(ServiceError::App(AppError::AccountInactive));
        }

        info!(user_id = %user.id, "Tokens refreshed successfully");
        self.issue(&user)
    }

    /// Profile of the authenticated caller
    #[instrument(skip(self, identity), fields(user_id = %identity.user_id))]
    pub async fn current_user(&self, identity: &Identity) -> ServiceResult<UserResponse> {
        self.ctx
            .user_repo()
            .find_by_id(identity.user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| ServiceError::not_found("User", identity.user_id))
    }

    fn issue(&self, user: &User) -> ServiceResult<AuthResponse> {
        let identity = Identity::new(user.id, user.email.clone(), user.role);
        let TokenPair {
            access_token,
            refresh_token,
            token_type,
            expires_in,
            expires_at,
        } = self.ctx.jwt_service().generate_token_pair(&identity)?;

        Ok(AuthResponse {
            token: access_token,
            refresh_token,
            token_type,
            expires_in,
            expires_at,
            user: UserResponse::from(user),
        })
    }
}
