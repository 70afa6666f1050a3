//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of one
//! request and owns no state of its own.

pub mod auth;
pub mod bootstrap;
pub mod comment;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod message;
pub mod report;
pub mod user;

pub use auth::AuthService;
pub use bootstrap::{BootstrapService, SeedOutcome};
pub use comment::CommentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use dashboard::DashboardService;
pub use error::{ServiceError, ServiceResult};
pub use export::ExportService;
pub use message::MessageService;
pub use report::ReportService;
pub use user::UserService;
