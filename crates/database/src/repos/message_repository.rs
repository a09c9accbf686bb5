//! Repository for message data access operations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::entities::{Attachment, Message, NewMessage};
use crate::stores::MessageStore;
use crate::types::time::{from_millis, from_optional_millis, now_millis, to_millis};
use crate::types::{StoreError, StoreResult};

const MESSAGE_COLUMNS: &str = "id, chat_id, sender_id, receiver_id, text, created_at, updated_at";

#[derive(Debug, FromRow)]
struct MessageRow {
    id: String,
    chat_id: String,
    sender_id: String,
    receiver_id: Option<String>,
    text: String,
    created_at: i64,
    updated_at: i64,
}

impl MessageRow {
    fn into_message(self, attachments: Vec<Attachment>) -> StoreResult<Message> {
        Ok(Message {
            id: Uuid::parse_str(&self.id)?,
            chat_id: Uuid::parse_str(&self.chat_id)?,
            sender_id: Uuid::parse_str(&self.sender_id)?,
            receiver_id: self.receiver_id.as_deref().map(Uuid::parse_str).transpose()?,
            text: self.text,
            attachments,
            created_at: from_millis(self.created_at)?,
            updated_at: from_millis(self.updated_at)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct AttachmentRow {
    id: String,
    message_id: String,
    url: String,
    content_type: String,
    size_bytes: i64,
}

/// Repository for message database operations
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Attach each row's attachments with a single batched lookup.
    async fn hydrate(&self, rows: Vec<MessageRow>) -> StoreResult<Vec<Message>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, message_id, url, content_type, size_bytes
             FROM message_attachment WHERE message_id IN (",
        );
        let mut separated = builder.separated(", ");
        for row in &rows {
            separated.push_bind(row.id.clone());
        }
        separated.push_unseparated(") ORDER BY message_id, position ASC");

        let attachment_rows = builder
            .build_query_as::<AttachmentRow>()
            .fetch_all(&self.pool)
            .await?;

        let mut by_message: HashMap<String, Vec<Attachment>> = HashMap::new();
        for row in attachment_rows {
            by_message.entry(row.message_id).or_default().push(Attachment {
                id: Uuid::parse_str(&row.id)?,
                url: row.url,
                content_type: row.content_type,
                size_bytes: row.size_bytes,
            });
        }

        rows.into_iter()
            .map(|row| {
                let attachments = by_message.remove(&row.id).unwrap_or_default();
                row.into_message(attachments)
            })
            .collect()
    }
}

#[async_trait]
impl MessageStore for MessageRepository {
    async fn save_message(&self, message: &NewMessage) -> StoreResult<Message> {
        let id = Uuid::new_v4();
        let now = now_millis();
        let chat_id = message.chat_id.to_string();

        let mut tx = self.pool.begin().await?;

        // updated_at never moves backwards, even with clock skew between writers
        let touched = sqlx::query("UPDATE chat SET updated_at = MAX(updated_at, ?) WHERE id = ?")
            .bind(to_millis(now))
            .bind(&chat_id)
            .execute(&mut *tx)
            .await?;

        if touched.rows_affected() == 0 {
            return Err(StoreError::ChatNotFound);
        }

        sqlx::query(
            "INSERT INTO message (id, chat_id, sender_id, receiver_id, text, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&chat_id)
        .bind(message.sender_id.to_string())
        .bind(message.receiver_id.map(|r| r.to_string()))
        .bind(&message.text)
        .bind(to_millis(now))
        .bind(to_millis(now))
        .execute(&mut *tx)
        .await?;

        let mut attachments = Vec::with_capacity(message.attachments.len());
        for (position, attachment) in message.attachments.iter().enumerate() {
            let attachment_id = Uuid::new_v4();
            sqlx::query(
                "INSERT INTO message_attachment (id, message_id, url, content_type, size_bytes, position)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(attachment_id.to_string())
            .bind(id.to_string())
            .bind(&attachment.url)
            .bind(&attachment.content_type)
            .bind(attachment.size_bytes)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;

            attachments.push(Attachment {
                id: attachment_id,
                url: attachment.url.clone(),
                content_type: attachment.content_type.clone(),
                size_bytes: attachment.size_bytes,
            });
        }

        tx.commit().await?;

        info!(
            message_id = %id,
            chat_id = %message.chat_id,
            sender_id = %message.sender_id,
            attachments = attachments.len(),
            "saved message"
        );

        Ok(Message {
            id,
            chat_id: message.chat_id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            text: message.text.clone(),
            attachments,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_messages_for_chat_older(
        &self,
        chat_id: Uuid,
        count: u32,
        before: DateTime<Utc>,
    ) -> StoreResult<Vec<Message>> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM message
             WHERE chat_id = ? AND created_at < ?
             ORDER BY created_at DESC, seq DESC
             LIMIT ?"
        );

        let rows = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(chat_id.to_string())
            .bind(to_millis(before))
            .bind(i64::from(count))
            .fetch_all(&self.pool)
            .await?;

        debug!(chat_id = %chat_id, messages = rows.len(), "loaded message page");

        self.hydrate(rows).await
    }

    async fn get_message_by_id(&self, message_id: Uuid) -> StoreResult<Message> {
        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM message WHERE id = ?");

        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(message_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::MessageNotFound)?;

        self.hydrate(vec![row])
            .await?
            .pop()
            .ok_or(StoreError::MessageNotFound)
    }

    async fn get_last_message(&self, chat_id: Uuid) -> StoreResult<Option<Message>> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM message
             WHERE chat_id = ?
             ORDER BY created_at DESC, seq DESC
             LIMIT 1"
        );

        let row = sqlx::query_as::<_, MessageRow>(&sql)
            .bind(chat_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn delete_message(&self, message_id: Uuid) -> StoreResult<()> {
        let id = message_id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM message_attachment WHERE message_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM message WHERE id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(StoreError::MessageNotFound);
        }

        tx.commit().await?;

        info!(message_id = %message_id, "deleted message");
        Ok(())
    }

    async fn update_last_read_ts(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
        ts: DateTime<Utc>,
    ) -> StoreResult<DateTime<Utc>> {
        let ms = to_millis(ts);

        // RETURNING must be stepped to completion or the write stays uncommitted
        let returned: Vec<i64> = sqlx::query_scalar(
            "UPDATE chat_user
             SET last_read = MAX(COALESCE(last_read, ?), ?)
             WHERE chat_id = ? AND user_id = ?
             RETURNING last_read",
        )
        .bind(ms)
        .bind(ms)
        .bind(chat_id.to_string())
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let effective = returned
            .into_iter()
            .next()
            .ok_or(StoreError::ParticipantNotFound)?;

        debug!(
            chat_id = %chat_id,
            user_id = %user_id,
            requested = ms,
            effective,
            "updated read cursor"
        );

        from_millis(effective)
    }

    async fn get_last_read_ts(&self, chat_id: Uuid, user_id: Uuid) -> StoreResult<Option<DateTime<Utc>>> {
        let row: Option<(Option<i64>,)> =
            sqlx::query_as("SELECT last_read FROM chat_user WHERE chat_id = ? AND user_id = ?")
                .bind(chat_id.to_string())
                .bind(user_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        let (last_read,) = row.ok_or(StoreError::ParticipantNotFound)?;
        from_optional_millis(last_read)
    }

    async fn get_num_unread_messages(&self, chat_id: Uuid, user_id: Uuid) -> StoreResult<u64> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT (
                 SELECT COUNT(*) FROM message m
                 WHERE m.chat_id = cu.chat_id
                   AND m.sender_id != cu.user_id
                   AND (cu.last_read IS NULL OR m.created_at > cu.last_read)
             )
             FROM chat_user cu
             WHERE cu.chat_id = ? AND cu.user_id = ?",
        )
        .bind(chat_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let count = count.ok_or(StoreError::ParticipantNotFound)?;
        Ok(count.max(0) as u64)
    }
}
