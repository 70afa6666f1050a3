//! Read models joined with user names for listings and exports

use chrono::{DateTime, Utc};

use super::{Comment, Message, Report, ReportStatus};
use crate::value_objects::{IsoWeek, RecordId};

/// Row of a report listing
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub id: RecordId,
    pub user_id: RecordId,
    pub user_name: String,
    pub week_iso: IsoWeek,
    pub total_hours: f64,
    pub tasks_count: usize,
    pub status: ReportStatus,
    pub has_comments: bool,
    pub created_at: DateTime<Utc>,
}

/// A full report with its owner's identity
#[derive(Debug, Clone, PartialEq)]
pub struct ReportWithAuthor {
    pub report: Report,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub admin_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageWithParties {
    pub message: Message,
    pub sender_name: String,
    pub receiver_name: String,
}

/// Aggregates for one ISO week
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyStats {
    pub week_iso: IsoWeek,
    pub total_reports: i64,
    pub total_hours: f64,
    pub employees_reported: i64,
}

impl WeeklyStats {
    /// Average hours per reporting employee, rounded to two decimals
    pub fn average_hours_per_employee(&self) -> f64 {
        if self.employees_reported == 0 {
            return 0.0;
        }
        let avg = self.total_hours / self.employees_reported as f64;
        (avg * 100.0).round() / 100.0
    }
}

/// Mailbox counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageStats {
    pub total_messages: i64,
    pub unread_messages: i64,
    pub messages_this_week: i64,
}
