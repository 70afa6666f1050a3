//! Comment entity - administrator feedback attached to a report

use chrono::{DateTime, Utc};

use crate::value_objects::RecordId;

pub const COMMENT_CONTENT_MAX: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: RecordId,
    pub report_id: RecordId,
    pub admin_id: RecordId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(id: RecordId, report_id: RecordId, admin_id: RecordId, content: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            report_id,
            admin_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: RecordId) -> bool {
        self.admin_id == user_id
    }

    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }
}
