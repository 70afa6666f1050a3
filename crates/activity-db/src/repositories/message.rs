//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use activity_core::traits::{Mailbox, MessageFilter, MessageRepository, Page, RepoResult};
use activity_core::{DomainError, Message, MessageStats, MessageWithParties, RecordId};

use crate::mappers::convert_all;
use crate::models::{MessageModel, MessageStatsModel, MessageWithPartiesModel};

use super::error::{map_db_error, map_foreign_key_violation};

const INSERT_MESSAGE: &str = r"
    INSERT INTO messages (id, sender_id, receiver_id, subject, content, read_status, read_at, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
";

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `(sender_id, receiver_id)` bind values for a mailbox
fn mailbox_binds(mailbox: Mailbox) -> (Option<i64>, Option<i64>) {
    match mailbox {
        Mailbox::Sent(id) => (Some(id.into_inner()), None),
        Mailbox::Received(id) => (None, Some(id.into_inner())),
    }
}

fn bind_message<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    message: &'q Message,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(message.id.into_inner())
        .bind(message.sender_id.into_inner())
        .bind(message.receiver_id.into_inner())
        .bind(&message.subject)
        .bind(&message.content)
        .bind(message.read_status)
        .bind(message.read_at)
        .bind(message.created_at)
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Message>> {
        let row = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, sender_id, receiver_id, subject, content, read_status, read_at, created_at
            FROM messages
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_with_parties(&self, id: RecordId) -> RepoResult<Option<MessageWithParties>> {
        let row = sqlx::query_as::<_, MessageWithPartiesModel>(
            r"
            SELECT m.id, m.sender_id, m.receiver_id, m.subject, m.content, m.read_status,
                   m.read_at, m.created_at,
                   s.name AS sender_name, r.name AS receiver_name
            FROM messages m
            JOIN users s ON s.id = m.sender_id
            JOIN users r ON r.id = m.receiver_id
            WHERE m.id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(MessageWithParties::try_from).transpose()
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        bind_message(sqlx::query(INSERT_MESSAGE), message)
            .execute(&self.pool)
            .await
            .map_err(|e| map_foreign_key_violation(e, || DomainError::UserNotFound(message.receiver_id)))?;

        Ok(())
    }

    #[instrument(skip(self, messages), fields(count = messages.len()))]
    async fn create_many(&self, messages: &[Message]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for message in messages {
            bind_message(sqlx::query(INSERT_MESSAGE), message)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    map_foreign_key_violation(e, || DomainError::UserNotFound(message.receiver_id))
                })?;
        }

        tx.commit().await.map_err(map_db_error)?;
        debug!(count = messages.len(), "Stored message batch");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        mailbox: Mailbox,
        unread_only: bool,
        page: Page,
    ) -> RepoResult<Vec<MessageWithParties>> {
        let (sender_id, receiver_id) = mailbox_binds(mailbox);
        let rows = sqlx::query_as::<_, MessageWithPartiesModel>(
            r"
            SELECT m.id, m.sender_id, m.receiver_id, m.subject, m.content, m.read_status,
                   m.read_at, m.created_at,
                   s.name AS sender_name, r.name AS receiver_name
            FROM messages m
            JOIN users s ON s.id = m.sender_id
            JOIN users r ON r.id = m.receiver_id
            WHERE ($1::BIGINT IS NULL OR m.sender_id = $1)
              AND ($2::BIGINT IS NULL OR m.receiver_id = $2)
              AND (NOT $3 OR m.read_status = FALSE)
            ORDER BY m.created_at DESC, m.id DESC
            OFFSET $4 LIMIT $5
            ",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(unread_only)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(rows)
    }

    #[instrument(skip(self))]
    async fn mark_read(&self, id: RecordId, at: DateTime<Utc>) -> RepoResult<Message> {
        let row = sqlx::query_as::<_, MessageModel>(
            r"
            UPDATE messages
            SET read_status = TRUE, read_at = COALESCE(read_at, $2)
            WHERE id = $1
            RETURNING id, sender_id, receiver_id, subject, content, read_status, read_at, created_at
            ",
        )
        .bind(id.into_inner())
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(Message::from)
            .ok_or(DomainError::MessageNotFound(id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RecordId) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MessageNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn stats(&self, mailbox: Mailbox, week_start: DateTime<Utc>) -> RepoResult<MessageStats> {
        let (sender_id, receiver_id) = mailbox_binds(mailbox);
        let row = sqlx::query_as::<_, MessageStatsModel>(
            r"
            SELECT COUNT(*) AS total_messages,
                   COUNT(*) FILTER (WHERE read_status = FALSE) AS unread_messages,
                   COUNT(*) FILTER (WHERE created_at >= $3) AS messages_this_week
            FROM messages
            WHERE ($1::BIGINT IS NULL OR sender_id = $1)
              AND ($2::BIGINT IS NULL OR receiver_id = $2)
            ",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(week_start)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn list_filtered(&self, filter: MessageFilter) -> RepoResult<Vec<MessageWithParties>> {
        let rows = sqlx::query_as::<_, MessageWithPartiesModel>(
            r"
            SELECT m.id, m.sender_id, m.receiver_id, m.subject, m.content, m.read_status,
                   m.read_at, m.created_at,
                   s.name AS sender_name, r.name AS receiver_name
            FROM messages m
            JOIN users s ON s.id = m.sender_id
            JOIN users r ON r.id = m.receiver_id
            WHERE ($1::BIGINT IS NULL OR m.sender_id = $1)
              AND ($2::BIGINT IS NULL OR m.receiver_id = $2)
              AND ($3::TIMESTAMPTZ IS NULL OR m.created_at >= $3)
              AND ($4::TIMESTAMPTZ IS NULL OR m.created_at <= $4)
            ORDER BY m.created_at DESC, m.id DESC
            ",
        )
        .bind(filter.sender_id.map(RecordId::into_inner))
        .bind(filter.receiver_id.map(RecordId::into_inner))
        .bind(filter.sent_from)
        .bind(filter.sent_until)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        convert_all(rows)
    }
}
