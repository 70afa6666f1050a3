//! Export service
//!
//! Loads the filtered rows, hands them to a renderer, and names the file.
//! Rendering is synchronous and happens after the last database call.

use activity_core::traits::{MessageFilter, Page, ReportFilter, UserFilter};
use activity_core::{DomainError, IsoWeek, User, WeeklyStats};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{info, instrument};

use crate::dto::{MessageExportQuery, ReportExportQuery, UserListQuery};
use crate::export::{CsvExporter, ExportFile, ExportFormat, PdfExporter};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::report::parse_optional_week;

const REPORTS_TITLE: &str = "Rapports Hebdomadaires";

fn parse_date(field: &str, value: Option<&str>) -> ServiceResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ServiceError::validation(format!("{field}: expected YYYY-MM-DD"))),
    }
}

/// `start_date` from 00:00:00, `end_date` through 23:59:59, both UTC
fn message_window(
    query: &MessageExportQuery,
) -> ServiceResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let from = parse_date("start_date", query.start_date.as_deref())?
        .map(|date| date.and_time(NaiveTime::MIN).and_utc());
    let until = parse_date("end_date", query.end_date.as_deref())?
        .map(|date| {
            date.and_hms_opt(23, 59, 59)
                .map(|end| end.and_utc())
                .ok_or_else(|| ServiceError::validation("end_date: out of range"))
        })
        .transpose()?;
    Ok((from, until))
}

/// Export service
pub struct ExportService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ExportService<'a> {
    /// Create a new ExportService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn reports_csv(&self, query: ReportExportQuery) -> ServiceResult<ExportFile> {
        let reports = self
            .ctx
            .report_repo()
            .list_with_authors(Self::report_filter(&query)?)
            .await?;

        let bytes = CsvExporter::new(self.ctx.display_offset())
            .reports(&reports, query.include_tasks_detail)
            .map_err(ServiceError::export)?;

        info!(reports = reports.len(), bytes = bytes.len(), "Report CSV exported");
        Ok(ExportFile::timestamped(bytes, ExportFormat::Csv, "rapports", Utc::now()))
    }

    #[instrument(skip(self))]
    pub async fn reports_pdf(&self, query: ReportExportQuery) -> ServiceResult<ExportFile> {
        let reports = self
            .ctx
            .report_repo()
            .list_with_authors(Self::report_filter(&query)?)
            .await?;

        let now = Utc::now();
        let bytes = PdfExporter::new(self.ctx.display_offset())
            .reports(REPORTS_TITLE, &reports, now)
            .map_err(ServiceError::export)?;

        info!(reports = reports.len(), bytes = bytes.len(), "Report PDF exported");
        Ok(ExportFile::timestamped(bytes, ExportFormat::Pdf, "rapports", now))
    }

    #[instrument(skip(self))]
    pub async fn users_csv(&self, query: UserListQuery) -> ServiceResult<ExportFile> {
        let users = self.users(query).await?;

        let bytes = CsvExporter::new(self.ctx.display_offset())
            .users(&users)
            .map_err(ServiceError::export)?;

        info!(users = users.len(), bytes = bytes.len(), "User CSV exported");
        Ok(ExportFile::timestamped(bytes, ExportFormat::Csv, "utilisateurs", Utc::now()))
    }

    #[instrument(skip(self))]
    pub async fn users_pdf(&self, query: UserListQuery) -> ServiceResult<ExportFile> {
        let users = self.users(query).await?;

        let now = Utc::now();
        let bytes = PdfExporter::new(self.ctx.display_offset())
            .users(&users, now)
            .map_err(ServiceError::export)?;

        info!(users = users.len(), bytes = bytes.len(), "User PDF exported");
        Ok(ExportFile::timestamped(bytes, ExportFormat::Pdf, "utilisateurs", now))
    }

    #[instrument(skip(self))]
    pub async fn messages_csv(&self, query: MessageExportQuery) -> ServiceResult<ExportFile> {
        let (sent_from, sent_until) = message_window(&query)?;
        let filter = MessageFilter {
            sender_id: query.sender_id,
            receiver_id: query.receiver_id,
            sent_from,
            sent_until,
        };
        let messages = self.ctx.message_repo().list_filtered(filter).await?;

        let bytes = CsvExporter::new(self.ctx.display_offset())
            .messages(&messages)
            .map_err(ServiceError::export)?;

        info!(messages = messages.len(), bytes = bytes.len(), "Message CSV exported");
        Ok(ExportFile::timestamped(bytes, ExportFormat::Csv, "messages", Utc::now()))
    }

    /// One-week summary; a week without reports still renders its zero stats
    #[instrument(skip(self))]
    pub async fn weekly_summary_pdf(&self, week_iso: &str) -> ServiceResult<ExportFile> {
        let week = IsoWeek::parse(week_iso.trim()).map_err(DomainError::from)?;

        let stats = self
            .ctx
            .report_repo()
            .weekly_stats(Some(week), Some(week))
            .await?
            .into_iter()
            .find(|stats| stats.week_iso == week)
            .unwrap_or(WeeklyStats {
                week_iso: week,
                total_reports: 0,
                total_hours: 0.0,
                employees_reported: 0,
            });

        let filter = ReportFilter {
            week_iso: Some(week),
            ..ReportFilter::default()
        };
        let reports = self.ctx.report_repo().list_with_authors(filter).await?;

        let bytes = PdfExporter::new(self.ctx.display_offset())
            .weekly_summary(&stats, &reports)
            .map_err(ServiceError::export)?;

        info!(week = %week, reports = reports.len(), "Weekly summary PDF exported");
        Ok(ExportFile::named(
            bytes,
            ExportFormat::Pdf,
            &format!("resume_hebdomadaire_{week}"),
        ))
    }

    fn report_filter(query: &ReportExportQuery) -> ServiceResult<ReportFilter> {
        Ok(ReportFilter {
            user_id: query.user_id,
            start_week: parse_optional_week(query.start_week.as_deref())?,
            end_week: parse_optional_week(query.end_week.as_deref())?,
            ..ReportFilter::default()
        })
    }

    /// Every matching user, sorted by name
    async fn users(&self, query: UserListQuery) -> ServiceResult<Vec<User>> {
        let filter = UserFilter {
            role: query.role,
            status: query.status,
        };

        let mut users = Vec::new();
        let mut page = Page::first(Page::MAX_LIMIT);
        loop {
            let batch = self.ctx.user_repo().list(filter, page).await?;
            let exhausted = batch.len() < usize::try_from(page.limit).unwrap_or_default();
            users.extend(batch);
            if exhausted {
                break;
            }
            page = Page::new(page.skip + page.limit, page.limit);
        }

        users.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(users)
    }
}
