//! Report database models

use activity_core::Task;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

/// Row of the `reports` table; tasks live in a JSONB array
#[derive(Debug, Clone, FromRow)]
pub struct ReportModel {
    pub id: i64,
    pub user_id: i64,
    pub week_iso: String,
    pub tasks: Json<Vec<Task>>,
    pub difficulties: Option<String>,
    pub remarks: Option<String>,
    pub total_hours: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Report joined with its owner
#[derive(Debug, Clone, FromRow)]
pub struct ReportWithAuthorModel {
    #[sqlx(flatten)]
    pub report: ReportModel,
    pub user_name: String,
    pub user_email: String,
}

/// Listing row
#[derive(Debug, Clone, FromRow)]
pub struct ReportSummaryModel {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub week_iso: String,
    pub total_hours: f64,
    pub tasks_count: i32,
    pub status: String,
    pub has_comments: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct WeeklyStatsModel {
    pub week_iso: String,
    pub total_reports: i64,
    pub total_hours: f64,
    pub employees_reported: i64,
}
