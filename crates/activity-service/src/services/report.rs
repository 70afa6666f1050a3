//! Report service
//!
//! One report per employee per ISO week. The `(user_id, week_iso)` unique
//! constraint decides concurrent creates; there is no check-then-insert here.

use activity_core::traits::{Page, ReportFilter};
use activity_core::{
    DomainError, Identity, IsoWeek, RecordId, Report, ReportWithAuthor, Task,
};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::dto::{
    CreateReportRequest, PaginatedResponse, ReportListQuery, ReportResponse,
    ReportSummaryResponse, UpdateReportRequest, WeekRangeQuery, WeeklyStatsResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Parse an optional `YYYY-Www` query value; blank counts as absent
pub(crate) fn parse_optional_week(value: Option<&str>) -> Result<Option<IsoWeek>, DomainError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => IsoWeek::parse(raw).map(Some).map_err(DomainError::from),
    }
}

/// Report service
pub struct ReportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReportService<'a> {
    /// Create a new ReportService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Submit the caller's report for a week
    #[instrument(skip(self, author, request), fields(user_id = %author.user_id, week = %request.week_iso))]
    pub async fn create(
        &self,
        author: &Identity,
        request: CreateReportRequest,
    ) -> ServiceResult<ReportResponse> {
        let week_iso = IsoWeek::parse(request.week_iso.trim()).map_err(DomainError::from)?;
        let report = Report::new(
            self.ctx.generate_id(),
            author.user_id,
            week_iso,
            request.tasks.into_iter().map(Task::from).collect(),
            request.difficulties,
            request.remarks,
        )?;

        let owner = self
            .ctx
            .user_repo()
            .find_by_id(author.user_id)
            .await?
            .ok_or(DomainError::UserNotFound(author.user_id))?;

        self.ctx.report_repo().create(&report).await?;

        info!(
            report_id = %report.id,
            total_hours = report.total_hours,
            tasks = report.tasks_count(),
            "Report submitted"
        );

        Ok(ReportResponse::from(ReportWithAuthor {
            report,
            user_name: owner.name,
            user_email: owner.email,
        }))
    }

    /// Full report; the owner or any admin
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn get(&self, requester: &Identity, report_id: RecordId) -> ServiceResult<ReportResponse> {
        let view = self.find(report_id).await?;
        if !requester.is_admin() && !view.report.is_owned_by(requester.user_id) {
            warn!(report_id = %report_id, "Report read refused: not the owner");
            return Err(DomainError::NotReportOwner.into());
        }
        Ok(ReportResponse::from(view))
    }

    /// Owner edit before review. Present fields replace stored ones.
    #[instrument(skip(self, requester, request), fields(user_id = %requester.user_id))]
    pub async fn update(
        &self,
        requester: &Identity,
        report_id: RecordId,
        request: UpdateReportRequest,
    ) -> ServiceResult<ReportResponse> {
        let mut view = self.find(report_id).await?;
        let report = &mut view.report;

        if !report.is_owned_by(requester.user_id) {
            warn!(report_id = %report_id, "Report update refused: not the owner");
            return Err(DomainError::NotReportOwner.into());
        }
        report.ensure_editable()?;

        if let Some(tasks) = request.tasks {
            report.replace_tasks(tasks.into_iter().map(Task::from).collect())?;
        }
        if let Some(difficulties) = request.difficulties {
            report.set_difficulties(Some(difficulties))?;
        }
        if let Some(remarks) = request.remarks {
            report.set_remarks(Some(remarks))?;
        }

        self.ctx.report_repo().update_content(report).await?;

        info!(report_id = %report_id, total_hours = report.total_hours, "Report updated");
        Ok(ReportResponse::from(view))
    }

    /// The owner before review, or any admin
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn delete(&self, requester: &Identity, report_id: RecordId) -> ServiceResult<()> {
        let report = self
            .ctx
            .report_repo()
            .find_by_id(report_id)
            .await?
            .ok_or(DomainError::ReportNotFound(report_id))?;

        if requester.is_admin() {
            self.ctx.report_repo().delete(report_id).await?;
        } else {
            if !report.is_owned_by(requester.user_id) {
                warn!(report_id = %report_id, "Report delete refused: not the owner");
                return Err(DomainError::NotReportOwner.into());
            }
            report.ensure_editable()?;
            self.ctx.report_repo().delete_submitted(report_id).await?;
        }

        info!(report_id = %report_id, "Report deleted");
        Ok(())
    }

    /// Admin sign-off. Reviewing twice is a no-op.
    #[instrument(skip(self, reviewer), fields(reviewer_id = %reviewer.user_id))]
    pub async fn review(&self, reviewer: &Identity, report_id: RecordId) -> ServiceResult<ReportResponse> {
        let mut view = self.find(report_id).await?;
        let already_reviewed = view.report.is_locked();

        view.report = self
            .ctx
            .report_repo()
            .mark_reviewed(report_id, Utc::now())
            .await?;
        if !already_reviewed {
            info!(report_id = %report_id, "Report reviewed");
        }

        Ok(ReportResponse::from(view))
    }

    /// Filtered listing. Employees only ever see their own reports.
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn list(
        &self,
        requester: &Identity,
        query: ReportListQuery,
        page: Page,
    ) -> ServiceResult<PaginatedResponse<ReportSummaryResponse>> {
        let user_id = if requester.is_admin() {
            query.user_id
        } else {
            if query.user_id.is_some_and(|id| id != requester.user_id) {
                warn!("Report listing refused: other employee requested");
                return Err(ServiceError::access_denied(
                    "employees can only list their own reports",
                ));
            }
            Some(requester.user_id)
        };

        let filter = ReportFilter {
            user_id,
            week_iso: parse_optional_week(query.week_iso.as_deref())?,
            start_week: parse_optional_week(query.start_week.as_deref())?,
            end_week: parse_optional_week(query.end_week.as_deref())?,
            status: query.status,
        };

        let reports = self.ctx.report_repo().list(filter, page).await?;
        let total = self.ctx.report_repo().count(filter).await?;

        Ok(PaginatedResponse::new(
            reports.into_iter().map(ReportSummaryResponse::from).collect(),
            page.skip,
            page.limit,
            total,
        ))
    }

    /// Per-week aggregates, newest week first
    #[instrument(skip(self))]
    pub async fn weekly_stats(&self, query: WeekRangeQuery) -> ServiceResult<Vec<WeeklyStatsResponse>> {
        let start = parse_optional_week(query.start_week.as_deref())?;
        let end = parse_optional_week(query.end_week.as_deref())?;

        let stats = self.ctx.report_repo().weekly_stats(start, end).await?;
        Ok(stats.into_iter().map(WeeklyStatsResponse::from).collect())
    }

    async fn find(&self, report_id: RecordId) -> ServiceResult<ReportWithAuthor> {
        self.ctx
            .report_repo()
            .find_with_author(report_id)
            .await?
            .ok_or_else(|| DomainError::ReportNotFound(report_id).into())
    }
}
