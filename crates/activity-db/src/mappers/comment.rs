//! Comment models -> entities

use activity_core::{Comment, CommentWithAuthor, DomainError, RecordId};

use crate::models::{CommentModel, CommentWithAuthorModel};

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: RecordId::new(model.id),
            report_id: RecordId::new(model.report_id),
            admin_id: RecordId::new(model.admin_id),
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl TryFrom<CommentWithAuthorModel> for CommentWithAuthor {
    type Error = DomainError;

    fn try_from(model: CommentWithAuthorModel) -> Result<Self, Self::Error> {
        Ok(CommentWithAuthor {
            comment: model.comment.into(),
            admin_name: model.admin_name,
        })
    }
}
