//! PostgreSQL implementation of CommentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use activity_core::traits::{CommentRepository, Page, RepoResult};
use activity_core::{Comment, CommentWithAuthor, DomainError, RecordId};

use crate::mappers::convert_all;
use crate::models::{CommentModel, CommentWithAuthorModel};

use super::error::{map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of CommentRepository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentModel>(
            r"
            SELECT id, report_id, admin_id, content, created_at, updated_at
            FROM comments
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Comment::from))
    }

    #[instrument(skip(self))]
    async fn find_with_author(&self, id: RecordId) -> RepoResult<Option<CommentWithAuthor>> {
        let row = sqlx::query_as::<_, CommentWithAuthorModel>(
            r"
            SELECT c.id, c.report_id, c.admin_id, c.content, c.created_at, c.updated_at,
                   u.name AS admin_name
            FROM comments c
            JOIN users u ON u.id = c.admin_id
            WHERE c.id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(CommentWithAuthor::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_report(&self, report_id: RecordId) -> RepoResult<Vec<CommentWithAuthor>> {
        let rows = sqlx::query_as::<_, CommentWithAuthorModel>(
            r"
            SELECT c.id, c.report_id, c.admin_id, c.content, c.created_at, c.updated_at,
                   u.name AS admin_name
            FROM comments c
            JOIN users u ON u.id = c.admin_id
            WHERE c.report_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            ",
        )
        .bind(report_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(rows)
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        report_id: Option<RecordId>,
        page: Page,
    ) -> RepoResult<Vec<CommentWithAuthor>> {
        let rows = sqlx::query_as::<_, CommentWithAuthorModel>(
            r"
            SELECT c.id, c.report_id, c.admin_id, c.content, c.created_at, c.updated_at,
                   u.name AS admin_name
            FROM comments c
            JOIN users u ON u.id = c.admin_id
            WHERE ($1::BIGINT IS NULL OR c.report_id = $1)
            ORDER BY c.created_at DESC, c.id DESC
            OFFSET $2 LIMIT $3
            ",
        )
        .bind(report_id.map(RecordId::into_inner))
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(rows)
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id, report_id = %comment.report_id))]
    async fn create(&self, comment: &Comment) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO comments (id, report_id, admin_id, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(comment.id.into_inner())
        .bind(comment.report_id.into_inner())
        .bind(comment.admin_id.into_inner())
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_foreign_key_violation(e, || DomainError::ReportNotFound(comment.report_id)))?;

        Ok(())
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn update(&self, comment: &Comment) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE comments
            SET content = $2, updated_at = $3
            WHERE id = $1
            ",
        )
        .bind(comment.id.into_inner())
        .bind(&comment.content)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CommentNotFound(comment.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RecordId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CommentNotFound(id));
        }

        Ok(())
    }
}
