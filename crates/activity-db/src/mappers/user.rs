//! User model -> entity

use activity_core::{DomainError, RecordId, User};

use super::parse_column;
use crate::models::UserModel;

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User {
            id: RecordId::new(model.id),
            email: model.email,
            name: model.name,
            role: parse_column(&model.role, "users.role")?,
            status: parse_column(&model.status, "users.status")?,
            last_login_at: model.last_login_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
