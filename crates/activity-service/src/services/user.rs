//! User service
//!
//! Account administration. Accounts are deactivated, never deleted, so their
//! reports and messages keep a valid author.

use activity_core::traits::{Page, UserFilter};
use activity_core::{DomainError, Identity, RecordId, Role, User, UserStatus};
use tracing::{info, instrument};

use crate::dto::{CreateUserRequest, PaginatedResponse, UpdateUserRequest, UserListQuery, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// List accounts, sorted by name
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        query: UserListQuery,
        page: Page,
    ) -> ServiceResult<PaginatedResponse<UserResponse>> {
        let filter = UserFilter {
            role: query.role,
            status: query.status,
        };
        let users = self.ctx.user_repo().list(filter, page).await?;
        let total = self.ctx.user_repo().count(filter).await?;

        Ok(PaginatedResponse::new(
            users.into_iter().map(UserResponse::from).collect(),
            page.skip,
            page.limit,
            total,
        ))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: RecordId) -> ServiceResult<UserResponse> {
        self.find(user_id).await.map(UserResponse::from)
    }

    /// Active employees, the possible message recipients
    #[instrument(skip(self))]
    pub async fn employees(&self) -> ServiceResult<Vec<UserResponse>> {
        let filter = UserFilter {
            role: Some(Role::Employee),
            status: Some(UserStatus::Active),
        };
        let mut employees = Vec::new();
        let mut page = Page::first(Page::MAX_LIMIT);
        loop {
            let batch = self.ctx.user_repo().list(filter, page).await?;
            let exhausted = batch.len() < usize::try_from(page.limit).unwrap_or_default();
            employees.extend(batch.into_iter().map(UserResponse::from));
            if exhausted {
                return Ok(employees);
            }
            page = Page::new(page.skip + page.limit, page.limit);
        }
    }

    /// Create an account. The unique email index settles duplicates.
    #[instrument(skip(self, request), fields(email = %request.email, role = %request.role))]
    pub async fn create(&self, request: CreateUserRequest) -> ServiceResult<UserResponse> {
        let password_hash = self.ctx.password_service().hash(&request.password)?;
        let user = User::new(
            self.ctx.generate_id(),
            &request.email,
            request.name.trim().to_string(),
            request.role,
        );

        self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, role = %user.role, "User created");
        Ok(UserResponse::from(user))
    }

    /// Apply the present fields. The acting admin cannot set their own
    /// account inactive here either.
    #[instrument(skip(self, actor, request), fields(actor_id = %actor.user_id))]
    pub async fn update(
        &self,
        actor: &Identity,
        user_id: RecordId,
        request: UpdateUserRequest,
    ) -> ServiceResult<UserResponse> {
        if actor.user_id == user_id && request.status == Some(UserStatus::Inactive) {
            return Err(DomainError::CannotDeactivateSelf.into());
        }

        let mut user = self.find(user_id).await?;

        // Nothing is written if hashing fails
        let password_hash = request
            .password
            .as_deref()
            .map(|password| self.ctx.password_service().hash(password))
            .transpose()?;

        if let Some(name) = request.name {
            user.rename(name.trim().to_string());
        }
        if let Some(role) = request.role {
            user.set_role(role);
        }
        if let Some(status) = request.status {
            user.set_status(status);
        }

        self.ctx.user_repo().update(&user).await?;

        if let Some(password_hash) = password_hash {
            self.ctx
                .user_repo()
                .update_password(user.id, &password_hash)
                .await?;
            info!(user_id = %user.id, "Password changed");
        }

        info!(user_id = %user.id, "User updated");
        Ok(UserResponse::from(user))
    }

    /// Mark an account inactive. Admins cannot lock themselves out.
    #[instrument(skip(self, actor), fields(actor_id = %actor.user_id))]
    pub async fn deactivate(&self, actor: &Identity, user_id: RecordId) -> ServiceResult<()> {
        if actor.user_id == user_id {
            return Err(DomainError::CannotDeactivateSelf.into());
        }

        let mut user = self.find(user_id).await?;
        if !user.is_active() {
            return Ok(());
        }
        user.deactivate();
        self.ctx.user_repo().update(&user).await?;

        info!(user_id = %user.id, "User deactivated");
        Ok(())
    }

    async fn find(&self, user_id: RecordId) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::Domain(DomainError::UserNotFound(user_id)))
    }
}
