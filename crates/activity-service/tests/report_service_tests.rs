//! Report and comment services over in-memory repositories

mod common;

use std::sync::Arc;

use activity_core::traits::{Page, RepoResult, ReportFilter, ReportRepository};
use activity_core::{
    IsoWeek, RecordId, Report, ReportStatus, ReportSummary, ReportWithAuthor, WeeklyStats,
};
use activity_service::dto::{
    CommentListQuery, CreateCommentRequest, CreateReportRequest, ReportListQuery, TaskRequest,
    UpdateCommentRequest, UpdateReportRequest, WeekRangeQuery,
};
use activity_service::{CommentService, ReportService};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{MemoryStore, TestApp};

fn task(title: &str, hours: f64) -> TaskRequest {
    TaskRequest {
        title: title.to_string(),
        hours,
        notes: None,
        project: None,
    }
}

fn week_request(week: &str) -> CreateReportRequest {
    CreateReportRequest {
        week_iso: week.to_string(),
        tasks: vec![task("Design", 5.0), task("Review", 3.0)],
        difficulties: None,
        remarks: None,
    }
}

#[tokio::test]
async fn test_create_report_totals_hours_and_rejects_duplicate_week() {
    let app = TestApp::new();
    let employee = app.employee("Awa");
    let service = ReportService::new(&app.ctx);

    let report = service
        .create(&employee, week_request("2024-W05"))
        .await
        .unwrap();
    assert_eq!(report.total_hours, 8.0);
    assert_eq!(report.status, ReportStatus::Submitted);
    assert_eq!(report.tasks_count, 2);
    assert_eq!(report.user_name, "Awa");
    assert_eq!(report.week_iso.to_string(), "2024-W05");

    let err = service
        .create(&employee, week_request("2024-W05"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);
    assert_eq!(err.error_code(), "DUPLICATE_REPORT");

    // Another employee may use the same week
    let other = app.employee("Moussa");
    assert!(service.create(&other, week_request("2024-W05")).await.is_ok());
}

#[tokio::test]
async fn test_create_report_rejects_bad_week() {
    let app = TestApp::new();
    let employee = app.employee("Awa");

    let err = ReportService::new(&app.ctx)
        .create(&employee, week_request("2024-W60"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 422);
}

#[tokio::test]
async fn test_update_recomputes_total_until_reviewed() {
    let app = TestApp::new();
    let employee = app.employee("Awa");
    let admin = app.admin("Chef");
    let service = ReportService::new(&app.ctx);

    let report = service
        .create(&employee, week_request("2024-W05"))
        .await
        .unwrap();

    let updated = service
        .update(
            &employee,
            report.id,
            UpdateReportRequest {
                tasks: Some(vec![task("Design", 6.5), task("Tests", 2.0), task("Docs", 1.5)]),
                remarks: Some("RAS".into()),
                ..UpdateReportRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.total_hours, 10.0);
    assert_eq!(updated.tasks_count, 3);
    assert_eq!(updated.remarks.as_deref(), Some("RAS"));

    let reviewed = service.review(&admin, report.id).await.unwrap();
    assert_eq!(reviewed.status, ReportStatus::Reviewed);
    // Reviewing again changes nothing
    let again = service.review(&admin, report.id).await.unwrap();
    assert_eq!(again.updated_at, reviewed.updated_at);

    let err = service
        .update(&employee, report.id, UpdateReportRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);

    let err = service.delete(&employee, report.id).await.unwrap_err();
    assert_eq!(err.status_code(), 409);

    service.delete(&admin, report.id).await.unwrap();
    let err = service.get(&admin, report.id).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

/// Reads return the report as it was, then an admin review lands before
/// the caller writes anything back
struct ReviewedAfterRead {
    store: Arc<MemoryStore>,
}

#[async_trait]
impl ReportRepository for ReviewedAfterRead {
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Report>> {
        let found = ReportRepository::find_by_id(self.store.as_ref(), id).await?;
        self.store.mark_reviewed(id, Utc::now()).await?;
        Ok(found)
    }

    async fn find_with_author(&self, id: RecordId) -> RepoResult<Option<ReportWithAuthor>> {
        let found = ReportRepository::find_with_author(self.store.as_ref(), id).await?;
        self.store.mark_reviewed(id, Utc::now()).await?;
        Ok(found)
    }

    async fn create(&self, report: &Report) -> RepoResult<()> {
        ReportRepository::create(self.store.as_ref(), report).await
    }

    async fn update_content(&self, report: &Report) -> RepoResult<()> {
        self.store.update_content(report).await
    }

    async fn mark_reviewed(&self, id: RecordId, at: DateTime<Utc>) -> RepoResult<Report> {
        self.store.mark_reviewed(id, at).await
    }

    async fn delete(&self, id: RecordId) -> RepoResult<()> {
        ReportRepository::delete(self.store.as_ref(), id).await
    }

    async fn delete_submitted(&self, id: RecordId) -> RepoResult<()> {
        self.store.delete_submitted(id).await
    }

    async fn list(&self, filter: ReportFilter, page: Page) -> RepoResult<Vec<ReportSummary>> {
        ReportRepository::list(self.store.as_ref(), filter, page).await
    }

    async fn count(&self, filter: ReportFilter) -> RepoResult<i64> {
        ReportRepository::count(self.store.as_ref(), filter).await
    }

    async fn list_with_authors(&self, filter: ReportFilter) -> RepoResult<Vec<ReportWithAuthor>> {
        self.store.list_with_authors(filter).await
    }

    async fn weekly_stats(
        &self,
        start_week: Option<IsoWeek>,
        end_week: Option<IsoWeek>,
    ) -> RepoResult<Vec<WeeklyStats>> {
        self.store.weekly_stats(start_week, end_week).await
    }
}

#[tokio::test]
async fn test_owner_edit_racing_a_review_keeps_the_review() {
    let app = TestApp::new();
    let employee = app.employee("Awa");
    let report = ReportService::new(&app.ctx)
        .create(&employee, week_request("2024-W05"))
        .await
        .unwrap();

    let racing_ctx = app.context_with_reports(Arc::new(ReviewedAfterRead {
        store: app.store.clone(),
    }));
    let racing = ReportService::new(&racing_ctx);

    let err = racing
        .update(
            &employee,
            report.id,
            UpdateReportRequest {
                tasks: Some(vec![task("Rework", 40.0)]),
                ..UpdateReportRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);
    assert_eq!(err.error_code(), "REPORT_LOCKED");

    let stored = ReportRepository::find_by_id(app.store.as_ref(), report.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ReportStatus::Reviewed);
    assert_eq!(stored.total_hours, 8.0);
    assert_eq!(stored.tasks[0].title, "Design");

    // Same for an owner delete
    let err = racing.delete(&employee, report.id).await.unwrap_err();
    assert_eq!(err.error_code(), "REPORT_LOCKED");
    assert!(ReportRepository::find_by_id(app.store.as_ref(), report.id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_reports_are_private_to_their_owner() {
    let app = TestApp::new();
    let awa = app.employee("Awa");
    let moussa = app.employee("Moussa");
    let admin = app.admin("Chef");
    let service = ReportService::new(&app.ctx);

    let report = service.create(&awa, week_request("2024-W05")).await.unwrap();
    service.create(&moussa, week_request("2024-W05")).await.unwrap();
    service.create(&moussa, week_request("2024-W06")).await.unwrap();

    assert_eq!(
        service.get(&moussa, report.id).await.unwrap_err().status_code(),
        403
    );
    assert!(service.get(&admin, report.id).await.is_ok());

    let err = service
        .update(&moussa, report.id, UpdateReportRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    // Employees are scoped to their own rows
    let own = service
        .list(&moussa, ReportListQuery::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(own.pagination.total, 2);
    assert!(own.data.iter().all(|r| r.user_id == moussa.user_id));
    assert_eq!(own.data[0].week_iso.to_string(), "2024-W06");

    let err = service
        .list(
            &moussa,
            ReportListQuery {
                user_id: Some(awa.user_id),
                ..ReportListQuery::default()
            },
            Page::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    let everything = service
        .list(&admin, ReportListQuery::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(everything.pagination.total, 3);

    let week_five = service
        .list(
            &admin,
            ReportListQuery {
                week_iso: Some("2024-W05".into()),
                ..ReportListQuery::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(week_five.pagination.total, 2);
}

#[tokio::test]
async fn test_weekly_stats() {
    let app = TestApp::new();
    let awa = app.employee("Awa");
    let moussa = app.employee("Moussa");
    let service = ReportService::new(&app.ctx);

    service.create(&awa, week_request("2024-W05")).await.unwrap();
    service.create(&moussa, week_request("2024-W05")).await.unwrap();
    service.create(&moussa, week_request("2024-W06")).await.unwrap();

    let stats = service
        .weekly_stats(WeekRangeQuery {
            start_week: Some("2024-W05".into()),
            end_week: Some("2024-W05".into()),
        })
        .await
        .unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].total_reports, 2);
    assert_eq!(stats[0].total_hours, 16.0);
    assert_eq!(stats[0].employees_reported, 2);
    assert_eq!(stats[0].average_hours_per_employee, 8.0);
}

#[tokio::test]
async fn test_comments_visibility_and_authorship() {
    let app = TestApp::new();
    let awa = app.employee("Awa");
    let moussa = app.employee("Moussa");
    let chef = app.admin("Chef");
    let adjoint = app.admin("Adjoint");

    let report = ReportService::new(&app.ctx)
        .create(&awa, week_request("2024-W05"))
        .await
        .unwrap();
    let comments = CommentService::new(&app.ctx);

    let comment = comments
        .add(
            &chef,
            CreateCommentRequest {
                report_id: report.id,
                content: "  Bon travail  ".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(comment.content, "Bon travail");
    assert_eq!(comment.admin_name, "Chef");

    let visible = comments.list_for_report(&awa, report.id).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(
        comments
            .list_for_report(&moussa, report.id)
            .await
            .unwrap_err()
            .status_code(),
        403
    );
    assert_eq!(comments.get(&moussa, comment.id).await.unwrap_err().status_code(), 403);

    let err = comments
        .update(
            &adjoint,
            comment.id,
            UpdateCommentRequest {
                content: "Autre".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
    assert_eq!(comments.delete(&adjoint, comment.id).await.unwrap_err().status_code(), 403);

    let edited = comments
        .update(
            &chef,
            comment.id,
            UpdateCommentRequest {
                content: "Très bon travail".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(edited.content, "Très bon travail");

    let all = comments
        .list_all(CommentListQuery::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);

    comments.delete(&chef, comment.id).await.unwrap();
    assert_eq!(comments.get(&chef, comment.id).await.unwrap_err().status_code(), 404);
}

#[tokio::test]
async fn test_comment_on_missing_report() {
    let app = TestApp::new();
    let chef = app.admin("Chef");

    let err = CommentService::new(&app.ctx)
        .add(
            &chef,
            CreateCommentRequest {
                report_id: activity_core::RecordId::new(424_242),
                content: "?".into(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}
