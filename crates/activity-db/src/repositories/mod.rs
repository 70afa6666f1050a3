//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in activity-core.

mod comment;
mod error;
mod message;
mod report;
mod user;

pub use comment::PgCommentRepository;
pub use message::PgMessageRepository;
pub use report::PgReportRepository;
pub use user::PgUserRepository;
