//! # activity-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `activity-core`. It handles:
//!
//! - Connection pool management and the embedded schema
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use activity_db::{create_pool, run_migrations, PgReportRepository, PoolConfig};
//! use activity_core::traits::{Page, ReportFilter, ReportRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("postgres://localhost/activity")).await?;
//!     run_migrations(&pool).await?;
//!     let reports = PgReportRepository::new(pool);
//!     let latest = reports.list(ReportFilter::default(), Page::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, ping, run_migrations, PgPool, PoolConfig};
pub use repositories::{
    PgCommentRepository, PgMessageRepository, PgReportRepository, PgUserRepository,
};
