//! # activity-core
//!
//! Domain layer for weekly activity reporting: entities, value objects,
//! the role access policy, and repository traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    truncate_text, Comment, CommentWithAuthor, Message, MessageStats, MessageWithParties, Report,
    ReportStatus, ReportSummary, ReportWithAuthor, Role, Task, User, UserStatus, WeeklyStats,
};
pub use error::DomainError;
pub use policy::{authorize, Decision, Identity, Operation};
pub use traits::{
    CommentRepository, Mailbox, MessageFilter, MessageRepository, Page, RepoResult, ReportFilter,
    ReportRepository, UserFilter, UserRepository,
};
pub use value_objects::{Capabilities, IdGenerator, IsoWeek, IsoWeekError, RecordId, RecordIdError};
