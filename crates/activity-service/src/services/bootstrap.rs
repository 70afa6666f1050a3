//! Startup seeding of the first administrator account

use activity_core::{DomainError, Role, User};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// What `seed_admin` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyPresent,
    /// No password configured
    Skipped,
}

/// Bootstrap service
pub struct BootstrapService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BootstrapService<'a> {
    /// Create a new BootstrapService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create the configured admin unless an account already uses its email
    #[instrument(skip(self), fields(email = %self.ctx.admin_seed().email))]
    pub async fn seed_admin(&self) -> ServiceResult<SeedOutcome> {
        let seed = self.ctx.admin_seed();
        let Some(password) = seed.password.as_deref() else {
            warn!("ADMIN_PASSWORD not set, skipping admin seeding");
            return Ok(SeedOutcome::Skipped);
        };

        let email = User::normalize_email(&seed.email);
        if self.ctx.user_repo().find_by_email(&email).await?.is_some() {
            info!("Admin account already present");
            return Ok(SeedOutcome::AlreadyPresent);
        }

        let password_hash = self.ctx.password_service().hash(password)?;
        let admin = User::new(self.ctx.generate_id(), &email, seed.name.clone(), Role::Admin);
        match self.ctx.user_repo().create(&admin, &password_hash).await {
            Ok(()) => {
                info!(user_id = %admin.id, "Admin account seeded");
                Ok(SeedOutcome::Created)
            }
            // Another instance seeded the same email in the meantime
            Err(DomainError::EmailAlreadyExists) => Ok(SeedOutcome::AlreadyPresent),
            Err(e) => Err(e.into()),
        }
    }
}
