//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use activity_core::{
    CommentWithAuthor, MessageStats, MessageWithParties, ReportSummary, ReportWithAuthor, User,
    WeeklyStats,
};

use super::responses::{
    CommentResponse, MessageResponse, MessageStatsResponse, MessageSummaryResponse,
    ReportResponse, ReportSummaryResponse, UserResponse, WeeklyStatsResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            status: user.status,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// ============================================================================
// Report Mappers
// ============================================================================

impl From<ReportWithAuthor> for ReportResponse {
    fn from(view: ReportWithAuthor) -> Self {
        let report = view.report;
        Self {
            id: report.id,
            user_id: report.user_id,
            user_name: view.user_name,
            user_email: view.user_email,
            week_iso: report.week_iso,
            tasks_count: report.tasks_count(),
            tasks: report.tasks,
            total_hours: report.total_hours,
            difficulties: report.difficulties,
            remarks: report.remarks,
            status: report.status,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

impl From<ReportSummary> for ReportSummaryResponse {
    fn from(summary: ReportSummary) -> Self {
        Self {
            id: summary.id,
            user_id: summary.user_id,
            user_name: summary.user_name,
            week_iso: summary.week_iso,
            total_hours: summary.total_hours,
            tasks_count: summary.tasks_count,
            status: summary.status,
            has_comments: summary.has_comments,
            created_at: summary.created_at,
        }
    }
}

impl From<WeeklyStats> for WeeklyStatsResponse {
    fn from(stats: WeeklyStats) -> Self {
        Self {
            average_hours_per_employee: stats.average_hours_per_employee(),
            week_iso: stats.week_iso,
            total_reports: stats.total_reports,
            total_hours: stats.total_hours,
            employees_reported: stats.employees_reported,
        }
    }
}

// ============================================================================
// Comment Mappers
// ============================================================================

impl From<CommentWithAuthor> for CommentResponse {
    fn from(view: CommentWithAuthor) -> Self {
        let comment = view.comment;
        Self {
            id: comment.id,
            report_id: comment.report_id,
            admin_id: comment.admin_id,
            admin_name: view.admin_name,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

// ============================================================================
// Message Mappers
// ============================================================================

impl From<MessageWithParties> for MessageResponse {
    fn from(view: MessageWithParties) -> Self {
        let message = view.message;
        Self {
            id: message.id,
            sender_id: message.sender_id,
            sender_name: view.sender_name,
            receiver_id: message.receiver_id,
            receiver_name: view.receiver_name,
            subject: message.subject,
            content: message.content,
            read_status: message.read_status,
            read_at: message.read_at,
            created_at: message.created_at,
        }
    }
}

impl From<MessageWithParties> for MessageSummaryResponse {
    fn from(view: MessageWithParties) -> Self {
        let content_preview = view.message.preview();
        let message = view.message;
        Self {
            id: message.id,
            sender_id: message.sender_id,
            sender_name: view.sender_name,
            receiver_id: message.receiver_id,
            receiver_name: view.receiver_name,
            subject: message.subject,
            content_preview,
            read_status: message.read_status,
            created_at: message.created_at,
        }
    }
}

impl From<MessageStats> for MessageStatsResponse {
    fn from(stats: MessageStats) -> Self {
        Self {
            total_messages: stats.total_messages,
            unread_messages: stats.unread_messages,
            messages_this_week: stats.messages_this_week,
        }
    }
}
