//! Comment database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct CommentModel {
    pub id: i64,
    pub report_id: i64,
    pub admin_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthorModel {
    #[sqlx(flatten)]
    pub comment: CommentModel,
    pub admin_name: String,
}
