//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Record ids are serialized as strings for JavaScript compatibility.

use activity_core::{IsoWeek, RecordId, ReportStatus, Role, Task, UserStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Common Response Types
// ============================================================================

/// Offset-paginated listing
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, skip: i64, limit: i64, total: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta { skip, limit, total },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PaginationMeta {
    pub skip: i64,
    pub limit: i64,
    /// Rows matching the filters, ignoring skip/limit
    pub total: i64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: bool,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>) -> Self {
        Self {
            status: "healthy",
            service: service.into(),
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now(),
        }
    }
}

impl ReadinessResponse {
    pub fn ready(database_healthy: bool) -> Self {
        Self {
            status: if database_healthy { "ready" } else { "not_ready" },
            checks: HealthChecks {
                database: database_healthy,
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.checks.database
    }
}

// ============================================================================
// Auth Responses
// ============================================================================

/// Login / refresh response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Access token
    pub token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

// ============================================================================
// User Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: RecordId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: UserStatus,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Report Responses
// ============================================================================

/// Full report with its owner
#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub id: RecordId,
    pub user_id: RecordId,
    pub user_name: String,
    pub user_email: String,
    pub week_iso: IsoWeek,
    pub tasks: Vec<Task>,
    pub tasks_count: usize,
    pub total_hours: f64,
    pub difficulties: Option<String>,
    pub remarks: Option<String>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of a report listing
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummaryResponse {
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

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyStatsResponse {
    pub week_iso: IsoWeek,
    pub total_reports: i64,
    pub total_hours: f64,
    pub employees_reported: i64,
    pub average_hours_per_employee: f64,
}

// ============================================================================
// Comment Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: RecordId,
    pub report_id: RecordId,
    pub admin_id: RecordId,
    pub admin_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Message Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub id: RecordId,
    pub sender_id: RecordId,
    pub sender_name: String,
    pub receiver_id: RecordId,
    pub receiver_name: String,
    pub subject: Option<String>,
    pub content: String,
    pub read_status: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Mailbox row; content is cut to a preview
#[derive(Debug, Clone, Serialize)]
pub struct MessageSummaryResponse {
    pub id: RecordId,
    pub sender_id: RecordId,
    pub sender_name: String,
    pub receiver_id: RecordId,
    pub receiver_name: String,
    pub subject: Option<String>,
    pub content_preview: String,
    pub read_status: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BroadcastResponse {
    pub sent_count: usize,
    pub messages: Vec<MessageResponse>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MessageStatsResponse {
    pub total_messages: i64,
    pub unread_messages: i64,
    pub messages_this_week: i64,
}

// ============================================================================
// Dashboard Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub role: Role,
    pub current_week: IsoWeek,
    #[serde(flatten)]
    pub counters: DashboardCounters,
    pub recent_activity: Vec<ActivityItem>,
}

/// Role-scoped counters, flattened into the dashboard body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DashboardCounters {
    Admin {
        active_employees: i64,
        total_reports: i64,
        pending_reviews: i64,
        reports_this_week: i64,
        messages_sent: i64,
        unread_sent_messages: i64,
    },
    Employee {
        my_reports: i64,
        pending_reviews: i64,
        messages_received: i64,
        unread_messages: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Report,
    Message,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityItem {
    pub id: RecordId,
    pub kind: ActivityKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}
