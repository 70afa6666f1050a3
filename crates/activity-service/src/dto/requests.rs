//! Request DTOs for API endpoints
//!
//! Bodies implement `Deserialize` and `Validate`; query strings only
//! `Deserialize`. Week and date strings are parsed by the services so a bad
//! value is reported as a validation error rather than a malformed request.

use activity_core::{RecordId, ReportStatus, Role, Task, UserStatus};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

// ============================================================================
// User Requests
// ============================================================================

fn default_role() -> Role {
    Role::Employee
}

/// Create user request (admin)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[serde(default = "default_role")]
    pub role: Role,
}

/// Update user request (admin). Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    pub role: Option<Role>,

    pub status: Option<UserStatus>,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

// ============================================================================
// Report Requests
// ============================================================================

/// One task line of a report
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 200, message = "Task title must be 1-200 characters"))]
    pub title: String,

    #[validate(range(min = 0.0, max = 168.0, message = "Hours must be between 0 and 168"))]
    pub hours: f64,

    #[validate(length(max = 500, message = "Task notes must be at most 500 characters"))]
    pub notes: Option<String>,

    #[validate(length(max = 100, message = "Project must be at most 100 characters"))]
    pub project: Option<String>,
}

impl From<TaskRequest> for Task {
    fn from(request: TaskRequest) -> Self {
        Task {
            title: request.title,
            hours: request.hours,
            notes: request.notes,
            project: request.project,
        }
    }
}

/// Create report request. `total_hours` is never accepted from input.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReportRequest {
    /// `YYYY-Www`
    pub week_iso: String,

    #[validate(length(min = 1, message = "A report needs at least one task"), nested)]
    pub tasks: Vec<TaskRequest>,

    #[validate(length(max = 1000, message = "Difficulties must be at most 1000 characters"))]
    pub difficulties: Option<String>,

    #[validate(length(max = 1000, message = "Remarks must be at most 1000 characters"))]
    pub remarks: Option<String>,
}

/// Update report request. Present fields replace the stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateReportRequest {
    #[validate(length(min = 1, message = "A report needs at least one task"), nested)]
    pub tasks: Option<Vec<TaskRequest>>,

    #[validate(length(max = 1000, message = "Difficulties must be at most 1000 characters"))]
    pub difficulties: Option<String>,

    #[validate(length(max = 1000, message = "Remarks must be at most 1000 characters"))]
    pub remarks: Option<String>,
}

/// Report listing filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportListQuery {
    pub user_id: Option<RecordId>,
    pub week_iso: Option<String>,
    pub start_week: Option<String>,
    pub end_week: Option<String>,
    pub status: Option<ReportStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeekRangeQuery {
    pub start_week: Option<String>,
    pub end_week: Option<String>,
}

// ============================================================================
// Comment Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub report_id: RecordId,

    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CommentListQuery {
    pub report_id: Option<RecordId>,
}

// ============================================================================
// Message Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub receiver_id: RecordId,

    #[validate(length(max = 200, message = "Subject must be at most 200 characters"))]
    pub subject: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BroadcastMessageRequest {
    #[validate(length(min = 1, message = "At least one recipient is required"))]
    pub receiver_ids: Vec<RecordId>,

    #[validate(length(max = 200, message = "Subject must be at most 200 characters"))]
    pub subject: Option<String>,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct InboxQuery {
    #[serde(default)]
    pub unread_only: bool,
}

// ============================================================================
// Export Requests
// ============================================================================

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportExportQuery {
    pub start_week: Option<String>,
    pub end_week: Option<String>,
    pub user_id: Option<RecordId>,
    /// One row per task when true, one row per report otherwise
    #[serde(default = "default_true")]
    pub include_tasks_detail: bool,
}

impl Default for ReportExportQuery {
    fn default() -> Self {
        Self {
            start_week: None,
            end_week: None,
            user_id: None,
            include_tasks_detail: true,
        }
    }
}

/// Message export filters. Dates are `YYYY-MM-DD`; `end_date` covers the whole day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageExportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub sender_id: Option<RecordId>,
    pub receiver_id: Option<RecordId>,
}
