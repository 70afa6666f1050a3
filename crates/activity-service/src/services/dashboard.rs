//! Dashboard service
//!
//! Role-scoped counters plus the few most recent report and message events.

use activity_core::traits::{Mailbox, Page, ReportFilter, UserFilter};
use activity_core::{
    Identity, IsoWeek, MessageWithParties, ReportStatus, ReportSummary, Role, UserStatus,
};
use tracing::instrument;

use crate::dto::{ActivityItem, ActivityKind, DashboardCounters, DashboardResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

const RECENT_ACTIVITY: i64 = 5;

fn status_label(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Submitted => "soumis",
        ReportStatus::Reviewed => "revu",
    }
}

fn report_item(report: ReportSummary, admin_view: bool) -> ActivityItem {
    let status = status_label(report.status);
    let description = if admin_view {
        format!("Rapport {} de {} ({status})", report.week_iso, report.user_name)
    } else {
        format!("Votre rapport {} ({status})", report.week_iso)
    };
    ActivityItem {
        id: report.id,
        kind: ActivityKind::Report,
        description,
        timestamp: report.created_at,
    }
}

fn message_item(view: MessageWithParties, admin_view: bool) -> ActivityItem {
    let mut description = if admin_view {
        format!("Message envoyé à {}", view.receiver_name)
    } else {
        format!("Message de {}", view.sender_name)
    };
    if let Some(subject) = view.message.subject.as_deref().filter(|s| !s.is_empty()) {
        description.push_str(": ");
        description.push_str(subject);
    }
    ActivityItem {
        id: view.message.id,
        kind: ActivityKind::Message,
        description,
        timestamp: view.message.created_at,
    }
}

/// Newest first, at most `limit` items
fn merge_recent(mut items: Vec<ActivityItem>, limit: usize) -> Vec<ActivityItem> {
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.truncate(limit);
    items
}

/// Dashboard service
pub struct DashboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DashboardService<'a> {
    /// Create a new DashboardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, requester), fields(user_id = %requester.user_id, role = %requester.role))]
    pub async fn stats(&self, requester: &Identity) -> ServiceResult<DashboardResponse> {
        let current_week = IsoWeek::current();
        let (week_start, _) = current_week.utc_range();
        let admin_view = requester.is_admin();

        let (report_scope, mailbox) = if admin_view {
            (ReportFilter::default(), Mailbox::Sent(requester.user_id))
        } else {
            (
                ReportFilter {
                    user_id: Some(requester.user_id),
                    ..ReportFilter::default()
                },
                Mailbox::Received(requester.user_id),
            )
        };
        let pending_scope = ReportFilter {
            status: Some(ReportStatus::Submitted),
            ..report_scope
        };

        let reports = self.ctx.report_repo();
        let total_reports = reports.count(report_scope).await?;
        let pending_reviews = reports.count(pending_scope).await?;
        let messages = self
            .ctx
            .message_repo()
            .stats(mailbox, week_start)
            .await?;

        let counters = if admin_view {
            let active_employees = self
                .ctx
                .user_repo()
                .count(UserFilter {
                    role: Some(Role::Employee),
                    status: Some(UserStatus::Active),
                })
                .await?;
            let reports_this_week = reports
                .count(ReportFilter {
                    week_iso: Some(current_week),
                    ..ReportFilter::default()
                })
                .await?;
            DashboardCounters::Admin {
                active_employees,
                total_reports,
                pending_reviews,
                reports_this_week,
                messages_sent: messages.total_messages,
                unread_sent_messages: messages.unread_messages,
            }
        } else {
            DashboardCounters::Employee {
                my_reports: total_reports,
                pending_reviews,
                messages_received: messages.total_messages,
                unread_messages: messages.unread_messages,
            }
        };

        let recent_reports = reports
            .list(report_scope, Page::first(RECENT_ACTIVITY))
            .await?;
        let recent_messages = self
            .ctx
            .message_repo()
            .list(mailbox, false, Page::first(RECENT_ACTIVITY))
            .await?;

        let items = recent_reports
            .into_iter()
            .map(|report| report_item(report, admin_view))
            .chain(
                recent_messages
                    .into_iter()
                    .map(|message| message_item(message, admin_view)),
            )
            .collect();

        Ok(DashboardResponse {
            role: requester.role,
            current_week,
            counters,
            recent_activity: merge_recent(items, usize::try_from(RECENT_ACTIVITY).unwrap_or(5)),
        })
    }
}
