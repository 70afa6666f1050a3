//! PostgreSQL implementation of ReportRepository
//!
//! Week filters compare the `YYYY-Www` text directly; zero-padded ISO weeks
//! sort lexicographically in calendar order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use activity_core::traits::{Page, RepoResult, ReportFilter, ReportRepository};
use activity_core::{
    DomainError, IsoWeek, RecordId, Report, ReportSummary, ReportWithAuthor, WeeklyStats,
};

use crate::mappers::convert_all;
use crate::models::{ReportModel, ReportSummaryModel, ReportWithAuthorModel, WeeklyStatsModel};

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of ReportRepository
#[derive(Clone)]
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Error for a guarded write that touched no row
    async fn locked_or_missing(&self, id: RecordId) -> DomainError {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM reports WHERE id = $1)",
        )
        .bind(id.into_inner())
        .fetch_one(&self.pool)
        .await;

        match exists {
            Ok(true) => DomainError::ReportLocked(id),
            Ok(false) => DomainError::ReportNotFound(id),
            Err(e) => map_db_error(e),
        }
    }
}

/// Filter values in bind order ($1..$5)
struct FilterBinds {
    user_id: Option<i64>,
    week_iso: Option<String>,
    start_week: Option<String>,
    end_week: Option<String>,
    status: Option<&'static str>,
}

impl From<&ReportFilter> for FilterBinds {
    fn from(filter: &ReportFilter) -> Self {
        Self {
            user_id: filter.user_id.map(RecordId::into_inner),
            week_iso: filter.week_iso.map(|w| w.to_string()),
            start_week: filter.start_week.map(|w| w.to_string()),
            end_week: filter.end_week.map(|w| w.to_string()),
            status: filter.status.map(|s| s.as_str()),
        }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Report>> {
        let row = sqlx::query_as::<_, ReportModel>(
            r"
            SELECT id, user_id, week_iso, tasks, difficulties, remarks, total_hours, status,
                   created_at, updated_at
            FROM reports
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Report::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_with_author(&self, id: RecordId) -> RepoResult<Option<ReportWithAuthor>> {
        let row = sqlx::query_as::<_, ReportWithAuthorModel>(
            r"
            SELECT r.id, r.user_id, r.week_iso, r.tasks, r.difficulties, r.remarks,
                   r.total_hours, r.status, r.created_at, r.updated_at,
                   u.name AS user_name, u.email AS user_email
            FROM reports r
            JOIN users u ON u.id = r.user_id
            WHERE r.id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(ReportWithAuthor::try_from).transpose()
    }

    /// The `(user_id, week_iso)` unique constraint settles concurrent creates
    #[instrument(skip(self, report), fields(report_id = %report.id, week = %report.week_iso))]
    async fn create(&self, report: &Report) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO reports (id, user_id, week_iso, tasks, difficulties, remarks,
                                 total_hours, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(report.id.into_inner())
        .bind(report.user_id.into_inner())
        .bind(report.week_iso.to_string())
        .bind(Json(&report.tasks))
        .bind(&report.difficulties)
        .bind(&report.remarks)
        .bind(report.total_hours)
        .bind(report.status.as_str())
        .bind(report.created_at)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let is_week_clash = e
                .as_database_error()
                .is_some_and(|db| db.constraint() == Some("reports_user_week_key"));
            if is_week_clash {
                DomainError::DuplicateReport(report.week_iso)
            } else {
                map_foreign_key_violation(e, || DomainError::UserNotFound(report.user_id))
            }
        })?;

        Ok(())
    }

    /// `status = 'submitted'` sits in the WHERE clause so a review landing
    /// between the owner's read and this write is never undone
    #[instrument(skip(self, report), fields(report_id = %report.id))]
    async fn update_content(&self, report: &Report) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE reports
            SET tasks = $2, difficulties = $3, remarks = $4, total_hours = $5,
                updated_at = $6
            WHERE id = $1 AND status = 'submitted'
            ",
        )
        .bind(report.id.into_inner())
        .bind(Json(&report.tasks))
        .bind(&report.difficulties)
        .bind(&report.remarks)
        .bind(report.total_hours)
        .bind(report.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(self.locked_or_missing(report.id).await);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_reviewed(&self, id: RecordId, at: DateTime<Utc>) -> RepoResult<Report> {
        let row = sqlx::query_as::<_, ReportModel>(
            r"
            UPDATE reports
            SET status = 'reviewed',
                updated_at = CASE WHEN status = 'reviewed' THEN updated_at ELSE $2 END
            WHERE id = $1
            RETURNING id, user_id, week_iso, tasks, difficulties, remarks, total_hours,
                      status, created_at, updated_at
            ",
        )
        .bind(id.into_inner())
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Report::try_from)
            .transpose()?
            .ok_or(DomainError::ReportNotFound(id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RecordId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ReportNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_submitted(&self, id: RecordId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1 AND status = 'submitted'")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(self.locked_or_missing(id).await);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: ReportFilter, page: Page) -> RepoResult<Vec<ReportSummary>> {
        let binds = FilterBinds::from(&filter);
        let rows = sqlx::query_as::<_, ReportSummaryModel>(
            r"
            SELECT r.id, r.user_id, u.name AS user_name, r.week_iso, r.total_hours,
                   jsonb_array_length(r.tasks) AS tasks_count, r.status,
                   EXISTS (SELECT 1 FROM comments c WHERE c.report_id = r.id) AS has_comments,
                   r.created_at
            FROM reports r
            JOIN users u ON u.id = r.user_id
            WHERE ($1::BIGINT IS NULL OR r.user_id = $1)
              AND ($2::TEXT IS NULL OR r.week_iso = $2)
              AND ($3::TEXT IS NULL OR r.week_iso >= $3)
              AND ($4::TEXT IS NULL OR r.week_iso <= $4)
              AND ($5::TEXT IS NULL OR r.status = $5)
            ORDER BY r.week_iso DESC, r.created_at DESC, r.id DESC
            OFFSET $6 LIMIT $7
            ",
        )
        .bind(binds.user_id)
        .bind(binds.week_iso)
        .bind(binds.start_week)
        .bind(binds.end_week)
        .bind(binds.status)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(rows)
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: ReportFilter) -> RepoResult<i64> {
        let binds = FilterBinds::from(&filter);
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM reports r
            WHERE ($1::BIGINT IS NULL OR r.user_id = $1)
              AND ($2::TEXT IS NULL OR r.week_iso = $2)
              AND ($3::TEXT IS NULL OR r.week_iso >= $3)
              AND ($4::TEXT IS NULL OR r.week_iso <= $4)
              AND ($5::TEXT IS NULL OR r.status = $5)
            ",
        )
        .bind(binds.user_id)
        .bind(binds.week_iso)
        .bind(binds.start_week)
        .bind(binds.end_week)
        .bind(binds.status)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn list_with_authors(&self, filter: ReportFilter) -> RepoResult<Vec<ReportWithAuthor>> {
        let binds = FilterBinds::from(&filter);
        let rows = sqlx::query_as::<_, ReportWithAuthorModel>(
            r"
            SELECT r.id, r.user_id, r.week_iso, r.tasks, r.difficulties, r.remarks,
                   r.total_hours, r.status, r.created_at, r.updated_at,
                   u.name AS user_name, u.email AS user_email
            FROM reports r
            JOIN users u ON u.id = r.user_id
            WHERE ($1::BIGINT IS NULL OR r.user_id = $1)
              AND ($2::TEXT IS NULL OR r.week_iso = $2)
              AND ($3::TEXT IS NULL OR r.week_iso >= $3)
              AND ($4::TEXT IS NULL OR r.week_iso <= $4)
              AND ($5::TEXT IS NULL OR r.status = $5)
            ORDER BY r.week_iso DESC, r.created_at DESC, r.id DESC
            ",
        )
        .bind(binds.user_id)
        .bind(binds.week_iso)
        .bind(binds.start_week)
        .bind(binds.end_week)
        .bind(binds.status)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(rows)
    }

    #[instrument(skip(self))]
    async fn weekly_stats(
        &self,
        start_week: Option<IsoWeek>,
        end_week: Option<IsoWeek>,
    ) -> RepoResult<Vec<WeeklyStats>> {
        let rows = sqlx::query_as::<_, WeeklyStatsModel>(
            r"
            SELECT week_iso,
                   COUNT(*) AS total_reports,
                   COALESCE(SUM(total_hours), 0)::DOUBLE PRECISION AS total_hours,
                   COUNT(DISTINCT user_id) AS employees_reported
            FROM reports
            WHERE ($1::TEXT IS NULL OR week_iso >= $1)
              AND ($2::TEXT IS NULL OR week_iso <= $2)
            GROUP BY week_iso
            ORDER BY week_iso DESC
            ",
        )
        .bind(start_week.map(|w| w.to_string()))
        .bind(end_week.map(|w| w.to_string()))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(rows)
    }
}
