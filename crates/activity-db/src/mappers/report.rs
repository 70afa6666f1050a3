//! Report models -> entities

use activity_core::{
    DomainError, RecordId, Report, ReportSummary, ReportWithAuthor, WeeklyStats,
};

use super::{parse_column, parse_week};
use crate::models::{ReportModel, ReportSummaryModel, ReportWithAuthorModel, WeeklyStatsModel};

impl TryFrom<ReportModel> for Report {
    type Error = DomainError;

    fn try_from(model: ReportModel) -> Result<Self, Self::Error> {
        Ok(Report {
            id: RecordId::new(model.id),
            user_id: RecordId::new(model.user_id),
            week_iso: parse_week(&model.week_iso)?,
            tasks: model.tasks.0,
            difficulties: model.difficulties,
            remarks: model.remarks,
            total_hours: model.total_hours,
            status: parse_column(&model.status, "reports.status")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<ReportWithAuthorModel> for ReportWithAuthor {
    type Error = DomainError;

    fn try_from(model: ReportWithAuthorModel) -> Result<Self, Self::Error> {
        Ok(ReportWithAuthor {
            report: Report::try_from(model.report)?,
            user_name: model.user_name,
            user_email: model.user_email,
        })
    }
}

impl TryFrom<ReportSummaryModel> for ReportSummary {
    type Error = DomainError;

    fn try_from(model: ReportSummaryModel) -> Result<Self, Self::Error> {
        Ok(ReportSummary {
            id: RecordId::new(model.id),
            user_id: RecordId::new(model.user_id),
            user_name: model.user_name,
            week_iso: parse_week(&model.week_iso)?,
            total_hours: model.total_hours,
            tasks_count: usize::try_from(model.tasks_count).unwrap_or_default(),
            status: parse_column(&model.status, "reports.status")?,
            has_comments: model.has_comments,
            created_at: model.created_at,
        })
    }
}

impl TryFrom<WeeklyStatsModel> for WeeklyStats {
    type Error = DomainError;

    fn try_from(model: WeeklyStatsModel) -> Result<Self, Self::Error> {
        Ok(WeeklyStats {
            week_iso: parse_week(&model.week_iso)?,
            total_reports: model.total_reports,
            total_hours: model.total_hours,
            employees_reported: model.employees_reported,
        })
    }
}
