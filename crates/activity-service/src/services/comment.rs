//! Comment service
//!
//! Admin commentary on reports. Visible to the report owner and to admins;
//! only the authoring admin may edit or remove a comment.

use activity_core::traits::Page;
use activity_core::{Comment, CommentWithAuthor, DomainError, Identity, RecordId};
use tracing::{info, instrument, warn};

use crate::dto::{CommentListQuery, CommentResponse, CreateCommentRequest, UpdateCommentRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Comment service
pub struct CommentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommentService<'a> {
    /// Create a new CommentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Attach a comment to a report
    #[instrument(skip(self, admin, request), fields(admin_id = %admin.user_id, report_id = %request.report_id))]
    pub async fn add(
        &self,
        admin: &Identity,
        request: CreateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        if self
            .ctx
            .report_repo()
            .find_by_id(request.report_id)
            .await?
            .is_none()
        {
            return Err(DomainError::ReportNotFound(request.report_id).into());
        }

        let comment = Comment::new(
            self.ctx.generate_id(),
            request.report_id,
            admin.user_id,
            request.content.trim().to_string(),
        );
        self.ctx.comment_repo().create(&comment).await?;

        info!(comment_id = %comment.id, "Comment added");
        self.view(comment.id).await.map(CommentResponse::from)
    }

    /// Comments of one report, oldest first
    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn list_for_report(
        &self,
        requester: &Identity,
        report_id: RecordId,
    ) -> ServiceResult<Vec<CommentResponse>> {
        self.ensure_can_read(requester, report_id).await?;

        let comments = self.ctx.comment_repo().list_by_report(report_id).await?;
        Ok(comments.into_iter().map(CommentResponse::from).collect())
    }

    #[instrument(skip(self, requester), fields(user_id = %requester.user_id))]
    pub async fn get(&self, requester: &Identity, comment_id: RecordId) -> ServiceResult<CommentResponse> {
        let view = self.view(comment_id).await?;
        self.ensure_can_read(requester, view.comment.report_id).await?;
        Ok(CommentResponse::from(view))
    }

    #[instrument(skip(self, admin, request), fields(admin_id = %admin.user_id))]
    pub async fn update(
        &self,
        admin: &Identity,
        comment_id: RecordId,
        request: UpdateCommentRequest,
    ) -> ServiceResult<CommentResponse> {
        let mut view = self.view(comment_id).await?;
        Self::ensure_author(admin, &view.comment)?;

        view.comment.edit(request.content.trim().to_string());
        self.ctx.comment_repo().update(&view.comment).await?;

        info!(comment_id = %comment_id, "Comment updated");
        Ok(CommentResponse::from(view))
    }

    #[instrument(skip(self, admin), fields(admin_id = %admin.user_id))]
    pub async fn delete(&self, admin: &Identity, comment_id: RecordId) -> ServiceResult<()> {
        let comment = self
            .ctx
            .comment_repo()
            .find_by_id(comment_id)
            .await?
            .ok_or(DomainError::CommentNotFound(comment_id))?;
        Self::ensure_author(admin, &comment)?;

        self.ctx.comment_repo().delete(comment_id).await?;

        info!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }

    /// Every comment, newest first, optionally for one report
    #[instrument(skip(self))]
    pub async fn list_all(
        &self,
        query: CommentListQuery,
        page: Page,
    ) -> ServiceResult<Vec<CommentResponse>> {
        let comments = self.ctx.comment_repo().list(query.report_id, page).await?;
        Ok(comments.into_iter().map(CommentResponse::from).collect())
    }

    async fn view(&self, comment_id: RecordId) -> ServiceResult<CommentWithAuthor> {
        self.ctx
            .comment_repo()
            .find_with_author(comment_id)
            .await?
            .ok_or_else(|| DomainError::CommentNotFound(comment_id).into())
    }

    /// Admins read every report's comments; employees only their own
    async fn ensure_can_read(&self, requester: &Identity, report_id: RecordId) -> ServiceResult<()> {
        let report = self
            .ctx
            .report_repo()
            .find_by_id(report_id)
            .await?
            .ok_or(DomainError::ReportNotFound(report_id))?;

        if requester.is_admin() || report.is_owned_by(requester.user_id) {
            Ok(())
        } else {
            warn!(report_id = %report_id, "Comment read refused: not the report owner");
            Err(DomainError::NotReportOwner.into())
        }
    }

    fn ensure_author(admin: &Identity, comment: &Comment) -> ServiceResult<()> {
        if comment.is_authored_by(admin.user_id) {
            Ok(())
        } else {
            warn!(comment_id = %comment.id, "Comment change refused: not the author");
            Err(ServiceError::Domain(DomainError::NotCommentAuthor))
        }
    }
}
