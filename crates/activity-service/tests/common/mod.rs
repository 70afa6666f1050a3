//! In-memory repositories and context wiring for service tests

#![allow(dead_code)]

use std::sync::Arc;

use activity_common::{AdminSeedConfig, JwtService};
use activity_core::traits::{
    CommentRepository, Mailbox, MessageFilter, MessageRepository, Page, RepoResult, ReportFilter,
    ReportRepository, UserFilter, UserRepository,
};
use activity_core::{
    Comment, CommentWithAuthor, DomainError, IdGenerator, Identity, IsoWeek, Message, MessageStats,
    MessageWithParties, RecordId, Report, ReportSummary, ReportWithAuthor, Role, User, WeeklyStats,
};
use activity_service::{ServiceContext, ServiceContextBuilder};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sqlx::postgres::PgPoolOptions;

pub const TEST_SECRET: &str = "service-test-secret-with-enough-length";

/// Everything the four repository traits need, behind one lock per table
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<(User, String)>>,
    reports: Mutex<Vec<Report>>,
    comments: Mutex<Vec<Comment>>,
    messages: Mutex<Vec<Message>>,
}

fn window<T>(items: Vec<T>, page: Page) -> Vec<T> {
    let skip = usize::try_from(page.skip).unwrap_or_default();
    let limit = usize::try_from(page.limit).unwrap_or_default();
    items.into_iter().skip(skip).take(limit).collect()
}

fn report_matches(report: &Report, filter: &ReportFilter) -> bool {
    filter.user_id.is_none_or(|id| report.user_id == id)
        && filter.week_iso.is_none_or(|week| report.week_iso == week)
        && filter.start_week.is_none_or(|week| report.week_iso >= week)
        && filter.end_week.is_none_or(|week| report.week_iso <= week)
        && filter.status.is_none_or(|status| report.status == status)
}

fn user_matches(user: &User, filter: &UserFilter) -> bool {
    filter.role.is_none_or(|role| user.role == role)
        && filter.status.is_none_or(|status| user.status == status)
}

impl MemoryStore {
    pub fn insert_user(&self, user: User) {
        self.users.lock().push((user, String::new()));
    }

    pub fn deactivate_user(&self, id: RecordId) {
        if let Some((user, _)) = self.users.lock().iter_mut().find(|(user, _)| user.id == id) {
            user.deactivate();
        }
    }

    pub fn user(&self, id: RecordId) -> Option<User> {
        self.users
            .lock()
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(user, _)| user.clone())
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().len()
    }

    fn user_name(&self, id: RecordId) -> String {
        self.user(id).map(|user| user.name).unwrap_or_default()
    }

    fn with_author(&self, report: Report) -> ReportWithAuthor {
        let user = self.user(report.user_id);
        ReportWithAuthor {
            user_name: user.as_ref().map(|u| u.name.clone()).unwrap_or_default(),
            user_email: user.map(|u| u.email).unwrap_or_default(),
            report,
        }
    }

    fn with_parties(&self, message: Message) -> MessageWithParties {
        MessageWithParties {
            sender_name: self.user_name(message.sender_id),
            receiver_name: self.user_name(message.receiver_id),
            message,
        }
    }

    fn comment_view(&self, comment: Comment) -> CommentWithAuthor {
        CommentWithAuthor {
            admin_name: self.user_name(comment.admin_id),
            comment,
        }
    }

    /// Reports matching `filter`, newest week first
    fn matching_reports(&self, filter: &ReportFilter) -> Vec<Report> {
        let mut reports: Vec<Report> = self
            .reports
            .lock()
            .iter()
            .filter(|report| report_matches(report, filter))
            .cloned()
            .collect();
        reports.sort_by(|a, b| {
            b.week_iso
                .cmp(&a.week_iso)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        reports
    }

    fn mailbox_messages(&self, mailbox: Mailbox) -> Vec<Message> {
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .iter()
            .filter(|message| match mailbox {
                Mailbox::Sent(id) => message.sender_id == id,
                Mailbox::Received(id) => message.receiver_id == id,
            })
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        messages
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<User>> {
        Ok(self.user(id))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .iter()
            .find(|(user, _)| user.email == email)
            .map(|(user, _)| user.clone()))
    }

    async fn find_by_ids(&self, ids: &[RecordId]) -> RepoResult<Vec<User>> {
        Ok(self
            .users
            .lock()
            .iter()
            .filter(|(user, _)| ids.contains(&user.id))
            .map(|(user, _)| user.clone())
            .collect())
    }

    async fn list(&self, filter: UserFilter, page: Page) -> RepoResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .iter()
            .filter(|(user, _)| user_matches(user, &filter))
            .map(|(user, _)| user.clone())
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(window(users, page))
    }

    async fn count(&self, filter: UserFilter) -> RepoResult<i64> {
        let count = self
            .users
            .lock()
            .iter()
            .filter(|(user, _)| user_matches(user, &filter))
            .count();
        Ok(i64::try_from(count).unwrap_or_default())
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        let mut users = self.users.lock();
        if users.iter().any(|(existing, _)| existing.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        users.push((user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut users = self.users.lock();
        let slot = users
            .iter_mut()
            .find(|(existing, _)| existing.id == user.id)
            .ok_or(DomainError::UserNotFound(user.id))?;
        slot.0 = user.clone();
        Ok(())
    }

    async fn get_password_hash(&self, id: RecordId) -> RepoResult<Option<String>> {
        Ok(self
            .users
            .lock()
            .iter()
            .find(|(user, _)| user.id == id)
            .map(|(_, hash)| hash.clone())
            .filter(|hash| !hash.is_empty()))
    }

    async fn update_password(&self, id: RecordId, password_hash: &str) -> RepoResult<()> {
        let mut users = self.users.lock();
        let slot = users
            .iter_mut()
            .find(|(user, _)| user.id == id)
            .ok_or(DomainError::UserNotFound(id))?;
        slot.1 = password_hash.to_string();
        Ok(())
    }

    async fn record_login(&self, id: RecordId, at: DateTime<Utc>) -> RepoResult<()> {
        let mut users = self.users.lock();
        let slot = users
            .iter_mut()
            .find(|(user, _)| user.id == id)
            .ok_or(DomainError::UserNotFound(id))?;
        slot.0.last_login_at = Some(at);
        Ok(())
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Report>> {
        Ok(self.reports.lock().iter().find(|r| r.id == id).cloned())
    }

    async fn find_with_author(&self, id: RecordId) -> RepoResult<Option<ReportWithAuthor>> {
        let report = self.reports.lock().iter().find(|r| r.id == id).cloned();
        Ok(report.map(|report| self.with_author(report)))
    }

    async fn create(&self, report: &Report) -> RepoResult<()> {
        if self.user(report.user_id).is_none() {
            return Err(DomainError::UserNotFound(report.user_id));
        }
        let mut reports = self.reports.lock();
        if reports
            .iter()
            .any(|r| r.user_id == report.user_id && r.week_iso == report.week_iso)
        {
            return Err(DomainError::DuplicateReport(report.week_iso));
        }
        reports.push(report.clone());
        Ok(())
    }

    async fn update_content(&self, report: &Report) -> RepoResult<()> {
        let mut reports = self.reports.lock();
        let slot = reports
            .iter_mut()
            .find(|r| r.id == report.id)
            .ok_or(DomainError::ReportNotFound(report.id))?;
        slot.ensure_editable()?;
        slot.tasks = report.tasks.clone();
        slot.difficulties = report.difficulties.clone();
        slot.remarks = report.remarks.clone();
        slot.total_hours = report.total_hours;
        slot.updated_at = report.updated_at;
        Ok(())
    }

    async fn mark_reviewed(&self, id: RecordId, at: DateTime<Utc>) -> RepoResult<Report> {
        let mut reports = self.reports.lock();
        let slot = reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DomainError::ReportNotFound(id))?;
        if slot.mark_reviewed() {
            slot.updated_at = at;
        }
        Ok(slot.clone())
    }

    async fn delete(&self, id: RecordId) -> RepoResult<()> {
        let mut reports = self.reports.lock();
        let before = reports.len();
        reports.retain(|r| r.id != id);
        if reports.len() == before {
            return Err(DomainError::ReportNotFound(id));
        }
        self.comments.lock().retain(|c| c.report_id != id);
        Ok(())
    }

    async fn delete_submitted(&self, id: RecordId) -> RepoResult<()> {
        let locked = self
            .reports
            .lock()
            .iter()
            .find(|r| r.id == id)
            .ok_or(DomainError::ReportNotFound(id))?
            .is_locked();
        if locked {
            return Err(DomainError::ReportLocked(id));
        }
        ReportRepository::delete(self, id).await
    }

    async fn list(&self, filter: ReportFilter, page: Page) -> RepoResult<Vec<ReportSummary>> {
        let summaries = self
            .matching_reports(&filter)
            .into_iter()
            .map(|report| ReportSummary {
                id: report.id,
                user_id: report.user_id,
                user_name: self.user_name(report.user_id),
                week_iso: report.week_iso,
                total_hours: report.total_hours,
                tasks_count: report.tasks_count(),
                status: report.status,
                has_comments: self.comments.lock().iter().any(|c| c.report_id == report.id),
                created_at: report.created_at,
            })
            .collect();
        Ok(window(summaries, page))
    }

    async fn count(&self, filter: ReportFilter) -> RepoResult<i64> {
        Ok(i64::try_from(self.matching_reports(&filter).len()).unwrap_or_default())
    }

    async fn list_with_authors(&self, filter: ReportFilter) -> RepoResult<Vec<ReportWithAuthor>> {
        Ok(self
            .matching_reports(&filter)
            .into_iter()
            .map(|report| self.with_author(report))
            .collect())
    }

    async fn weekly_stats(
        &self,
        start_week: Option<IsoWeek>,
        end_week: Option<IsoWeek>,
    ) -> RepoResult<Vec<WeeklyStats>> {
        let filter = ReportFilter {
            start_week,
            end_week,
            ..ReportFilter::default()
        };
        let mut stats: Vec<WeeklyStats> = Vec::new();
        let mut authors: Vec<(IsoWeek, RecordId)> = Vec::new();
        for report in self.matching_reports(&filter) {
            if !stats.iter().any(|s| s.week_iso == report.week_iso) {
                stats.push(WeeklyStats {
                    week_iso: report.week_iso,
                    total_reports: 0,
                    total_hours: 0.0,
                    employees_reported: 0,
                });
            }
            let Some(entry) = stats.iter_mut().find(|s| s.week_iso == report.week_iso) else {
                continue;
            };
            entry.total_reports += 1;
            entry.total_hours += report.total_hours;
            if !authors.contains(&(report.week_iso, report.user_id)) {
                authors.push((report.week_iso, report.user_id));
                entry.employees_reported += 1;
            }
        }
        Ok(stats)
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Comment>> {
        Ok(self.comments.lock().iter().find(|c| c.id == id).cloned())
    }

    async fn find_with_author(&self, id: RecordId) -> RepoResult<Option<CommentWithAuthor>> {
        let comment = self.comments.lock().iter().find(|c| c.id == id).cloned();
        Ok(comment.map(|comment| self.comment_view(comment)))
    }

    async fn list_by_report(&self, report_id: RecordId) -> RepoResult<Vec<CommentWithAuthor>> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .iter()
            .filter(|c| c.report_id == report_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments.into_iter().map(|c| self.comment_view(c)).collect())
    }

    async fn list(
        &self,
        report_id: Option<RecordId>,
        page: Page,
    ) -> RepoResult<Vec<CommentWithAuthor>> {
        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .iter()
            .filter(|c| report_id.is_none_or(|id| c.report_id == id))
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(window(comments, page)
            .into_iter()
            .map(|c| self.comment_view(c))
            .collect())
    }

    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        if !self.reports.lock().iter().any(|r| r.id == comment.report_id) {
            return Err(DomainError::ReportNotFound(comment.report_id));
        }
        self.comments.lock().push(comment.clone());
        Ok(())
    }

    async fn update(&self, comment: &Comment) -> RepoResult<()> {
        let mut comments = self.comments.lock();
        let slot = comments
            .iter_mut()
            .find(|c| c.id == comment.id)
            .ok_or(DomainError::CommentNotFound(comment.id))?;
        *slot = comment.clone();
        Ok(())
    }

    async fn delete(&self, id: RecordId) -> RepoResult<()> {
        let mut comments = self.comments.lock();
        let before = comments.len();
        comments.retain(|c| c.id != id);
        if comments.len() == before {
            return Err(DomainError::CommentNotFound(id));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Message>> {
        Ok(self.messages.lock().iter().find(|m| m.id == id).cloned())
    }

    async fn find_with_parties(&self, id: RecordId) -> RepoResult<Option<MessageWithParties>> {
        let message = self.messages.lock().iter().find(|m| m.id == id).cloned();
        Ok(message.map(|message| self.with_parties(message)))
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.create_many(std::slice::from_ref(message)).await
    }

    async fn create_many(&self, messages: &[Message]) -> RepoResult<()> {
        if let Some(missing) = messages.iter().find(|m| self.user(m.receiver_id).is_none()) {
            return Err(DomainError::UserNotFound(missing.receiver_id));
        }
        self.messages.lock().extend(messages.iter().cloned());
        Ok(())
    }

    async fn list(
        &self,
        mailbox: Mailbox,
        unread_only: bool,
        page: Page,
    ) -> RepoResult<Vec<MessageWithParties>> {
        let messages: Vec<Message> = self
            .mailbox_messages(mailbox)
            .into_iter()
            .filter(|m| !unread_only || !m.read_status)
            .collect();
        Ok(window(messages, page)
            .into_iter()
            .map(|m| self.with_parties(m))
            .collect())
    }

    async fn mark_read(&self, id: RecordId, at: DateTime<Utc>) -> RepoResult<Message> {
        let mut messages = self.messages.lock();
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(DomainError::MessageNotFound(id))?;
        message.mark_read(at);
        Ok(message.clone())
    }

    async fn delete(&self, id: RecordId) -> RepoResult<()> {
        let mut messages = self.messages.lock();
        let before = messages.len();
        messages.retain(|m| m.id != id);
        if messages.len() == before {
            return Err(DomainError::MessageNotFound(id));
        }
        Ok(())
    }

    async fn stats(&self, mailbox: Mailbox, week_start: DateTime<Utc>) -> RepoResult<MessageStats> {
        let messages = self.mailbox_messages(mailbox);
        let count = |n: usize| i64::try_from(n).unwrap_or_default();
        Ok(MessageStats {
            total_messages: count(messages.len()),
            unread_messages: count(messages.iter().filter(|m| !m.read_status).count()),
            messages_this_week: count(
                messages
                    .iter()
                    .filter(|m| m.created_at >= week_start)
                    .count(),
            ),
        })
    }

    async fn list_filtered(&self, filter: MessageFilter) -> RepoResult<Vec<MessageWithParties>> {
        let mut messages: Vec<Message> = self
            .messages
            .lock()
            .iter()
            .filter(|m| {
                filter.sender_id.is_none_or(|id| m.sender_id == id)
                    && filter.receiver_id.is_none_or(|id| m.receiver_id == id)
                    && filter.sent_from.is_none_or(|from| m.created_at >= from)
                    && filter.sent_until.is_none_or(|until| m.created_at <= until)
            })
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages.into_iter().map(|m| self.with_parties(m)).collect())
    }
}

/// Service context over a fresh in-memory store. The pool never connects.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub ctx: ServiceContext,
    next_id: std::sync::atomic::AtomicI64,
}

fn default_seed() -> AdminSeedConfig {
    AdminSeedConfig {
        email: "admin@sahelys.bf".to_string(),
        name: "Administrateur".to_string(),
        password: None,
    }
}

fn build_context(
    store: &Arc<MemoryStore>,
    reports: Arc<dyn ReportRepository>,
    admin_seed: AdminSeedConfig,
) -> ServiceContext {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .unwrap();

    ServiceContextBuilder::new()
        .pool(pool)
        .user_repo(store.clone())
        .report_repo(reports)
        .comment_repo(store.clone())
        .message_repo(store.clone())
        .jwt_service(Arc::new(JwtService::new(TEST_SECRET, 3600, 86_400)))
        .id_generator(Arc::new(IdGenerator::new(1).unwrap()))
        .admin_seed(admin_seed)
        .build()
        .unwrap()
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_seed(default_seed())
    }

    pub fn with_seed(admin_seed: AdminSeedConfig) -> Self {
        let store = Arc::new(MemoryStore::default());
        let ctx = build_context(&store, store.clone(), admin_seed);

        Self {
            store,
            ctx,
            next_id: std::sync::atomic::AtomicI64::new(1),
        }
    }

    /// A second context over the same store whose report access goes through `reports`
    pub fn context_with_reports(&self, reports: Arc<dyn ReportRepository>) -> ServiceContext {
        build_context(&self.store, reports, default_seed())
    }

    /// Insert an active user directly and return the identity it would log in with
    pub fn user(&self, name: &str, role: Role) -> Identity {
        let id = RecordId::new(
            self.next_id
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed),
        );
        let email = format!("{}@sahelys.bf", name.to_lowercase());
        self.store
            .insert_user(User::new(id, &email, name.to_string(), role));
        Identity::new(id, email, role)
    }

    pub fn admin(&self, name: &str) -> Identity {
        self.user(name, Role::Admin)
    }

    pub fn employee(&self, name: &str) -> Identity {
        self.user(name, Role::Employee)
    }
}
