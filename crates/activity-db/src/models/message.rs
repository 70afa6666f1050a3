//! Message database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub subject: Option<String>,
    pub content: String,
    pub read_status: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Message joined with sender and receiver names
#[derive(Debug, Clone, FromRow)]
pub struct MessageWithPartiesModel {
    #[sqlx(flatten)]
    pub message: MessageModel,
    pub sender_name: String,
    pub receiver_name: String,
}

#[derive(Debug, Clone, Copy, FromRow)]
pub struct MessageStatsModel {
    pub total_messages: i64,
    pub unread_messages: i64,
    pub messages_this_week: i64,
}
