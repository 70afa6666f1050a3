//! Domain entities - core business objects

mod comment;
mod message;
mod report;
mod user;
mod views;

pub use comment::{Comment, COMMENT_CONTENT_MAX};
pub use message::{truncate_text, Message, MESSAGE_CONTENT_MAX, MESSAGE_SUBJECT_MAX, PREVIEW_LEN};
pub use report::{
    Report, ReportStatus, Task, REPORT_TEXT_MAX, TASK_HOURS_MAX, TASK_NOTES_MAX, TASK_PROJECT_MAX,
    TASK_TITLE_MAX,
};
pub use user::{Role, User, UserStatus};
pub use views::{
    CommentWithAuthor, MessageStats, MessageWithParties, ReportSummary, ReportWithAuthor,
    WeeklyStats,
};
