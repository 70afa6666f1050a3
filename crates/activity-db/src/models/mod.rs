//! Database models - SQLx-compatible structs for PostgreSQL tables

mod comment;
mod message;
mod report;
mod user;

pub use comment::{CommentModel, CommentWithAuthorModel};
pub use message::{MessageModel, MessageStatsModel, MessageWithPartiesModel};
pub use report::{ReportModel, ReportSummaryModel, ReportWithAuthorModel, WeeklyStatsModel};
pub use user::UserModel;
