//! Service context - dependency container for services
//!
//! Holds all repositories and the credential helpers needed by services.

use std::sync::Arc;

use activity_common::auth::{JwtService, PasswordService};
use activity_common::{AdminSeedConfig, DisplayConfig};
use activity_core::traits::{
    CommentRepository, MessageRepository, ReportRepository, UserRepository,
};
use activity_core::{IdGenerator, RecordId};
use activity_db::PgPool;
use chrono::{FixedOffset, Offset, Utc};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Database repositories
/// - JWT and password services for authentication
/// - The record id generator
/// - Display and seed settings
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool
    pool: PgPool,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    report_repo: Arc<dyn ReportRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    message_repo: Arc<dyn MessageRepository>,

    // Services
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,
    id_generator: Arc<IdGenerator>,

    // Settings
    display: DisplayConfig,
    admin_seed: AdminSeedConfig,
}

impl ServiceContext {
    // === Database Pool ===

    /// Get the PostgreSQL connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn report_repo(&self) -> &dyn ReportRepository {
        self.report_repo.as_ref()
    }

    pub fn comment_repo(&self) -> &dyn CommentRepository {
        self.comment_repo.as_ref()
    }

    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    /// Generate a new record id
    pub fn generate_id(&self) -> RecordId {
        self.id_generator.next_id()
    }

    // === Settings ===

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    /// Offset used to render timestamps in exported files
    pub fn display_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.display.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    pub fn admin_seed(&self) -> &AdminSeedConfig {
        &self.admin_seed
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &"PgPool")
            .field("repositories", &"...")
            .field("id_generator", &self.id_generator)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    user_repo: Option<Arc<dyn UserRepository>>,
    report_repo: Option<Arc<dyn ReportRepository>>,
    comment_repo: Option<Arc<dyn CommentRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    id_generator: Option<Arc<IdGenerator>>,
    display: Option<DisplayConfig>,
    admin_seed: Option<AdminSeedConfig>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn report_repo(mut self, repo: Arc<dyn ReportRepository>) -> Self {
        self.report_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn id_generator(mut self, generator: Arc<IdGenerator>) -> Self {
        self.id_generator = Some(generator);
        self
    }

    pub fn display(mut self, display: DisplayConfig) -> Self {
        self.display = Some(display);
        self
    }

    pub fn admin_seed(mut self, admin_seed: AdminSeedConfig) -> Self {
        self.admin_seed = Some(admin_seed);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::internal(format!("{name} is required")))
        }

        Ok(ServiceContext {
            pool: required(self.pool, "pool")?,
            user_repo: required(self.user_repo, "user_repo")?,
            report_repo: required(self.report_repo, "report_repo")?,
            comment_repo: required(self.comment_repo, "comment_repo")?,
            message_repo: required(self.message_repo, "message_repo")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            password_service: PasswordService::new(),
            id_generator: required(self.id_generator, "id_generator")?,
            display: self.display.unwrap_or_else(|| DisplayConfig {
                utc_offset_minutes: 0,
                timezone_label: "UTC".to_string(),
            }),
            admin_seed: required(self.admin_seed, "admin_seed")?,
        })
    }
}
