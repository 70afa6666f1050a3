//! Message entity - one row per (sender, receiver) pair

use chrono::{DateTime, Utc};

use crate::value_objects::RecordId;

pub const MESSAGE_CONTENT_MAX: usize = 2000;
pub const MESSAGE_SUBJECT_MAX: usize = 200;
pub const PREVIEW_LEN: usize = 100;

/// A message delivered to a single receiver.
///
/// Broadcasts are stored as one `Message` per recipient so each copy
/// carries its own read state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: RecordId,
    pub sender_id: RecordId,
    pub receiver_id: RecordId,
    pub subject: Option<String>,
    pub content: String,
    pub read_status: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        id: RecordId,
        sender_id: RecordId,
        receiver_id: RecordId,
        subject: Option<String>,
        content: String,
    ) -> Self {
        Self {
            id,
            sender_id,
            receiver_id,
            subject,
            content,
            read_status: false,
            read_at: None,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_participant(&self, user_id: RecordId) -> bool {
        self.sender_id == user_id || self.receiver_id == user_id
    }

    /// Mark as read. `read_at` is only set the first time; returns whether
    /// anything changed.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.read_status {
            return false;
        }
        self.read_status = true;
        self.read_at.get_or_insert(at);
        true
    }

    pub fn preview(&self) -> String {
        truncate_text(&self.content, PREVIEW_LEN)
    }
}

/// Shorten `text` to at most `max` characters, ending in `...` when cut
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
