//! # activity-service
//!
//! Application layer: services enforcing record-level rules, request and
//! response DTOs, and the CSV/PDF export renderers.

pub mod dto;
pub mod export;
pub mod services;

pub use export::{ExportFile, ExportFormat};
pub use services::{
    AuthService, BootstrapService, CommentService, DashboardService, ExportService,
    MessageService, ReportService, SeedOutcome, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, UserService,
};
