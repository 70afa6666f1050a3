//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer states what it needs; the database crate provides the
//! PostgreSQL implementation and tests provide in-memory ones.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Comment, CommentWithAuthor, Message, MessageStats, MessageWithParties, Report, ReportStatus,
    ReportSummary, ReportWithAuthor, Role, User, UserStatus, WeeklyStats,
};
use crate::error::DomainError;
use crate::value_objects::{IsoWeek, RecordId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Offset pagination window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    /// Clamp `skip` to >= 0 and `limit` to 1..=MAX_LIMIT
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip: skip.max(0),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn first(limit: i64) -> Self {
        Self::new(0, limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}

// ============================================================================
// User Repository
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<User>>;

    /// Lookup by already-normalized email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// Users with any of the given ids; missing ids are simply absent
    async fn find_by_ids(&self, ids: &[RecordId]) -> RepoResult<Vec<User>>;

    /// Filtered listing sorted by name
    async fn list(&self, filter: UserFilter, page: Page) -> RepoResult<Vec<User>>;

    async fn count(&self, filter: UserFilter) -> RepoResult<i64>;

    /// Create a user; a taken email yields `EmailAlreadyExists`
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()>;

    async fn update(&self, user: &User) -> RepoResult<()>;

    async fn get_password_hash(&self, id: RecordId) -> RepoResult<Option<String>>;

    async fn update_password(&self, id: RecordId, password_hash: &str) -> RepoResult<()>;

    async fn record_login(&self, id: RecordId, at: DateTime<Utc>) -> RepoResult<()>;
}

// ============================================================================
// Report Repository
// ============================================================================

/// Report listing filters. Week bounds are inclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFilter {
    pub user_id: Option<RecordId>,
    pub week_iso: Option<IsoWeek>,
    pub start_week: Option<IsoWeek>,
    pub end_week: Option<IsoWeek>,
    pub status: Option<ReportStatus>,
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Report>>;

    async fn find_with_author(&self, id: RecordId) -> RepoResult<Option<ReportWithAuthor>>;

    /// Insert a report; an existing (user, week) pair yields `DuplicateReport`
    async fn create(&self, report: &Report) -> RepoResult<()>;

    /// Owner edit: writes tasks, difficulties, remarks, total hours and
    /// `updated_at` while the stored report is still submitted. The status
    /// column is never written here; a reviewed report yields `ReportLocked`.
    async fn update_content(&self, report: &Report) -> RepoResult<()>;

    /// Set the stored status to reviewed and return the stored report.
    /// `updated_at` moves to `at` on the first review only.
    async fn mark_reviewed(&self, id: RecordId, at: DateTime<Utc>) -> RepoResult<Report>;

    /// Delete a report and its comments
    async fn delete(&self, id: RecordId) -> RepoResult<()>;

    /// Owner delete: same as `delete` but only while the stored report is
    /// still submitted, otherwise `ReportLocked`
    async fn delete_submitted(&self, id: RecordId) -> RepoResult<()>;

    /// Summaries ordered by week descending, then creation descending
    async fn list(&self, filter: ReportFilter, page: Page) -> RepoResult<Vec<ReportSummary>>;

    async fn count(&self, filter: ReportFilter) -> RepoResult<i64>;

    /// Full reports for export, same ordering as `list`, unpaginated
    async fn list_with_authors(&self, filter: ReportFilter) -> RepoResult<Vec<ReportWithAuthor>>;

    /// Per-week aggregates, week descending
    async fn weekly_stats(
        &self,
        start_week: Option<IsoWeek>,
        end_week: Option<IsoWeek>,
    ) -> RepoResult<Vec<WeeklyStats>>;
}

// ============================================================================
// Comment Repository
// ============================================================================

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Comment>>;

    async fn find_with_author(&self, id: RecordId) -> RepoResult<Option<CommentWithAuthor>>;

    /// Comments of one report, oldest first
    async fn list_by_report(&self, report_id: RecordId) -> RepoResult<Vec<CommentWithAuthor>>;

    /// All comments, newest first
    async fn list(
        &self,
        report_id: Option<RecordId>,
        page: Page,
    ) -> RepoResult<Vec<CommentWithAuthor>>;

    async fn create(&self, comment: &Comment) -> RepoResult<()>;

    async fn update(&self, comment: &Comment) -> RepoResult<()>;

    async fn delete(&self, id: RecordId) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Which side of the conversation a mailbox query looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mailbox {
    Sent(RecordId),
    Received(RecordId),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFilter {
    pub sender_id: Option<RecordId>,
    pub receiver_id: Option<RecordId>,
    pub sent_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound
    pub sent_until: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Message>>;

    async fn find_with_parties(&self, id: RecordId) -> RepoResult<Option<MessageWithParties>>;

    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Insert all rows atomically; either every message is stored or none
    async fn create_many(&self, messages: &[Message]) -> RepoResult<()>;

    /// Mailbox listing, newest first
    async fn list(
        &self,
        mailbox: Mailbox,
        unread_only: bool,
        page: Page,
    ) -> RepoResult<Vec<MessageWithParties>>;

    /// Set the read flag. `read_at` keeps its first value; already-read
    /// messages are left untouched. Returns the stored message.
    async fn mark_read(&self, id: RecordId, at: DateTime<Utc>) -> RepoResult<Message>;

    async fn delete(&self, id: RecordId) -> RepoResult<()>;

    async fn stats(&self, mailbox: Mailbox, week_start: DateTime<Utc>) -> RepoResult<MessageStats>;

    /// Filtered messages for export, newest first
    async fn list_filtered(&self, filter: MessageFilter) -> RepoResult<Vec<MessageWithParties>>;
}
