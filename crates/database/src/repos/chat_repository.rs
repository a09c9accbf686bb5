//! Repository for chat data access operations.

use async_trait::async_trait;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::entities::{Chat, ChatType, NewChat, Participant, UserChatsQuery};
use crate::stores::ChatStore;
use crate::types::time::{from_millis, from_optional_millis, now_millis, to_millis};
use crate::types::{StoreError, StoreResult};

const CHAT_COLUMNS: &str = "c.id, c.name, c.avatar_url, c.chat_type, c.created_at, c.updated_at";

#[derive(Debug, FromRow)]
struct ChatRow {
    id: String,
    name: Option<String>,
    avatar_url: Option<String>,
    chat_type: String,
    created_at: i64,
    updated_at: i64,
    #[sqlx(default)]
    last_read_by_me: Option<i64>,
    #[sqlx(default)]
    last_read_by_other: Option<i64>,
}

impl TryFrom<ChatRow> for Chat {
    type Error = StoreError;

    fn try_from(row: ChatRow) -> StoreResult<Self> {
        Ok(Chat {
            id: Uuid::parse_str(&row.id)?,
            chat_type: row.chat_type.parse()?,
            name: row.name,
            avatar_url: row.avatar_url,
            created_at: from_millis(row.created_at)?,
            updated_at: from_millis(row.updated_at)?,
            last_message: None,
            last_read_by_me: from_optional_millis(row.last_read_by_me)?,
            last_read_by_other: from_optional_millis(row.last_read_by_other)?,
        })
    }
}

#[derive(Debug, FromRow)]
struct ParticipantRow {
    chat_id: String,
    user_id: String,
    last_read: Option<i64>,
    joined_at: i64,
}

impl TryFrom<ParticipantRow> for Participant {
    type Error = StoreError;

    fn try_from(row: ParticipantRow) -> StoreResult<Self> {
        Ok(Participant {
            chat_id: Uuid::parse_str(&row.chat_id)?,
            user_id: Uuid::parse_str(&row.user_id)?,
            last_read: from_optional_millis(row.last_read)?,
            joined_at: from_millis(row.joined_at)?,
        })
    }
}

/// Repository for chat database operations
#[derive(Clone)]
pub struct ChatRepository {
    pool: SqlitePool,
}

impl ChatRepository {
    /// Create a new chat repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Normalise the insert payload: dedupe participants and enforce the
    /// per-type column rules.
    fn prepare(chat: &NewChat) -> StoreResult<(Option<String>, Option<String>, Vec<Uuid>)> {
        let mut participant_ids = Vec::with_capacity(chat.participant_ids.len());
        for id in &chat.participant_ids {
            if !participant_ids.contains(id) {
                participant_ids.push(*id);
            }
        }

        match chat.chat_type {
            ChatType::Private => {
                if participant_ids.len() != 2 {
                    return Err(StoreError::invalid_record(
                        "a private chat needs exactly two distinct participants",
                    ));
                }
                Ok((None, None, participant_ids))
            }
            ChatType::Group => {
                let name = chat
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| StoreError::invalid_record("a group chat needs a name"))?;
                if participant_ids.is_empty() {
                    return Err(StoreError::invalid_record(
                        "a group chat needs at least one participant",
                    ));
                }
                Ok((Some(name.to_string()), chat.avatar_url.clone(), participant_ids))
            }
        }
    }
}

#[async_trait]
impl ChatStore for ChatRepository {
    async fn create_chat(&self, chat: &NewChat) -> StoreResult<Chat> {
        let (name, avatar_url, participant_ids) = Self::prepare(chat)?;

        let id = Uuid::new_v4();
        let now = now_millis();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO chat (id, name, avatar_url, chat_type, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&name)
        .bind(&avatar_url)
        .bind(chat.chat_type.as_str())
        .bind(to_millis(now))
        .bind(to_millis(now))
        .execute(&mut *tx)
        .await?;

        for user_id in &participant_ids {
            sqlx::query(
                "INSERT INTO chat_user (chat_id, user_id, last_read, joined_at) VALUES (?, ?, NULL, ?)",
            )
            .bind(id.to_string())
            .bind(user_id.to_string())
            .bind(to_millis(now))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            chat_id = %id,
            chat_type = %chat.chat_type,
            participants = participant_ids.len(),
            "created new chat"
        );

        Ok(Chat {
            id,
            chat_type: chat.chat_type,
            name,
            avatar_url,
            created_at: now,
            updated_at: now,
            last_message: None,
            last_read_by_me: None,
            last_read_by_other: None,
        })
    }

    async fn get_user_chats(&self, user_id: Uuid, query: &UserChatsQuery) -> StoreResult<Vec<Chat>> {
        let updated_after = query.updated_after.map(to_millis);
        // SQLite treats a negative LIMIT as "no limit"; a zero count means the same
        let limit = query
            .count
            .filter(|count| *count > 0)
            .map(i64::from)
            .unwrap_or(-1);

        // One pass over chat_user yields both cursors for every chat on the page
        let sql = format!(
            "SELECT {CHAT_COLUMNS},
                    me.last_read AS last_read_by_me,
                    MAX(other.last_read) AS last_read_by_other
             FROM chat c
             JOIN chat_user me ON me.chat_id = c.id AND me.user_id = ?
             LEFT JOIN chat_user other ON other.chat_id = c.id AND other.user_id != ?
             WHERE (? IS NULL OR c.updated_at > ?)
             GROUP BY c.id
             ORDER BY c.updated_at DESC, c.id ASC
             LIMIT ?"
        );

        let rows = sqlx::query_as::<_, ChatRow>(&sql)
            .bind(user_id.to_string())
            .bind(user_id.to_string())
            .bind(updated_after)
            .bind(updated_after)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(user_id = %user_id, chats = rows.len(), "loaded user chats");

        rows.into_iter().map(Chat::try_from).collect()
    }

    async fn get_chat(&self, chat_id: Uuid) -> StoreResult<Chat> {
        let sql = format!("SELECT {CHAT_COLUMNS} FROM chat c WHERE c.id = ?");

        sqlx::query_as::<_, ChatRow>(&sql)
            .bind(chat_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::ChatNotFound)
            .and_then(Chat::try_from)
    }

    async fn get_private_chat(&self, user_a: Uuid, user_b: Uuid) -> StoreResult<Chat> {
        let sql = format!(
            "SELECT {CHAT_COLUMNS}
             FROM chat c
             JOIN chat_user a ON a.chat_id = c.id AND a.user_id = ?
             JOIN chat_user b ON b.chat_id = c.id AND b.user_id = ?
             WHERE c.chat_type = 'private'
             ORDER BY c.created_at ASC, c.id ASC
             LIMIT 1"
        );

        sqlx::query_as::<_, ChatRow>(&sql)
            .bind(user_a.to_string())
            .bind(user_b.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::ChatNotFound)
            .and_then(Chat::try_from)
    }

    async fn exists(&self, chat_id: Uuid) -> StoreResult<bool> {
        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM chat WHERE id = ?)")
            .bind(chat_id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(found != 0)
    }

    async fn delete_chat(&self, chat_id: Uuid) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        let messages = purge_chat(&mut *tx, chat_id).await?;
        tx.commit().await?;

        info!(chat_id = %chat_id, messages, "deleted chat");
        Ok(())
    }

    async fn is_participant(&self, chat_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let found: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM chat_user WHERE chat_id = ? AND user_id = ?)",
        )
        .bind(chat_id.to_string())
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(found != 0)
    }

    async fn join_chat(&self, chat_id: Uuid, user_id: Uuid) -> StoreResult<Participant> {
        let now = now_millis();

        let result = sqlx::query(
            "INSERT INTO chat_user (chat_id, user_id, last_read, joined_at) VALUES (?, ?, NULL, ?)",
        )
        .bind(chat_id.to_string())
        .bind(user_id.to_string())
        .bind(to_millis(now))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(StoreError::ParticipantAlreadyExists);
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                return Err(StoreError::ChatNotFound);
            }
            Err(err) => return Err(err.into()),
        }

        info!(chat_id = %chat_id, user_id = %user_id, "user joined chat");

        Ok(Participant {
            chat_id,
            user_id,
            last_read: None,
            joined_at: now,
        })
    }

    async fn leave_chat(&self, chat_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let id = chat_id.to_string();
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM chat_user WHERE chat_id = ? AND user_id = ?")
            .bind(&id)
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;

        if removed.rows_affected() == 0 {
            return Err(StoreError::ParticipantNotFound);
        }

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chat_user WHERE chat_id = ?")
            .bind(&id)
            .fetch_one(&mut *tx)
            .await?;

        let dropped = remaining == 0;
        if dropped {
            purge_chat(&mut *tx, chat_id).await?;
        }

        tx.commit().await?;

        info!(chat_id = %chat_id, user_id = %user_id, dropped, "user left chat");
        Ok(dropped)
    }

    async fn get_chat_participants(&self, chat_id: Uuid) -> StoreResult<Vec<Participant>> {
        let rows = sqlx::query_as::<_, ParticipantRow>(
            "SELECT chat_id, user_id, last_read, joined_at
             FROM chat_user WHERE chat_id = ? ORDER BY joined_at ASC, user_id ASC",
        )
        .bind(chat_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Err(StoreError::ChatNotFound);
        }

        rows.into_iter().map(Participant::try_from).collect()
    }

    async fn get_num_unread_chats(&self, user_id: Uuid) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT c.id)
             FROM chat c
             JOIN chat_user cu ON cu.chat_id = c.id AND cu.user_id = ?
             JOIN message m ON m.seq = (
                 SELECT lm.seq FROM message lm
                 WHERE lm.chat_id = c.id
                 ORDER BY lm.created_at DESC, lm.seq DESC
                 LIMIT 1
             )
             WHERE m.sender_id != ?
               AND (cu.last_read IS NULL OR cu.last_read < c.updated_at)",
        )
        .bind(user_id.to_string())
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }
}

/// Remove a chat with its messages, attachments and participants; returns
/// the number of messages removed.
async fn purge_chat(conn: &mut SqliteConnection, chat_id: Uuid) -> StoreResult<u64> {
    let id = chat_id.to_string();

    sqlx::query(
        "DELETE FROM message_attachment
         WHERE message_id IN (SELECT id FROM message WHERE chat_id = ?)",
    )
    .bind(&id)
    .execute(&mut *conn)
    .await?;

    let messages = sqlx::query("DELETE FROM message WHERE chat_id = ?")
        .bind(&id)
        .execute(&mut *conn)
        .await?;

    sqlx::query("DELETE FROM chat_user WHERE chat_id = ?")
        .bind(&id)
        .execute(&mut *conn)
        .await?;

    let deleted = sqlx::query("DELETE FROM chat WHERE id = ?")
        .bind(&id)
        .execute(&mut *conn)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(StoreError::ChatNotFound);
    }

    Ok(messages.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NewMessage;
    use crate::repos::MessageRepository;
    use crate::stores::MessageStore;
    use crate::test_support::create_test_pool;
    use chrono::Duration;

    fn private_chat(a: Uuid, b: Uuid) -> NewChat {
        NewChat {
            chat_type: ChatType::Private,
            name: Some("ignored".to_string()),
            avatar_url: Some("https://cdn.example.com/ignored.png".to_string()),
            participant_ids: vec![a, b],
        }
    }

    fn group_chat(name: &str, members: Vec<Uuid>) -> NewChat {
        NewChat {
            chat_type: ChatType::Group,
            name: Some(name.to_string()),
            avatar_url: None,
            participant_ids: members,
        }
    }

    async fn set_updated_at(pool: &SqlitePool, chat_id: Uuid, ms: i64) {
        sqlx::query("UPDATE chat SET updated_at = ? WHERE id = ?")
            .bind(ms)
            .bind(chat_id.to_string())
            .execute(pool)
            .await
            .unwrap();
    }

    fn text_message(chat_id: Uuid, sender_id: Uuid, text: &str) -> NewMessage {
        NewMessage {
            chat_id,
            sender_id,
            receiver_id: None,
            text: text.to_string(),
            attachments: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_private_chat_drops_group_columns() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = ChatRepository::new(pool);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let chat = repo.create_chat(&private_chat(a, b)).await.unwrap();
        assert!(chat.is_private());
        assert!(chat.name.is_none());
        assert!(chat.avatar_url.is_none());

        let stored = repo.get_chat(chat.id).await.unwrap();
        assert!(stored.name.is_none());
        assert_eq!(stored.created_at, chat.created_at);

        let participants = repo.get_chat_participants(chat.id).await.unwrap();
        assert_eq!(participants.len(), 2);
        assert!(participants.iter().all(|p| p.last_read.is_none()));
    }

    #[tokio::test]
    async fn test_create_chat_enforces_type_rules() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = ChatRepository::new(pool);
        let a = Uuid::new_v4();

        let err = repo.create_chat(&private_chat(a, a)).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));

        let err = repo.create_chat(&group_chat("   ", vec![a])).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { .. }));

        let group = repo.create_chat(&group_chat("Book club", vec![a])).await.unwrap();
        assert_eq!(group.name.as_deref(), Some("Book club"));
    }

    #[tokio::test]
    async fn test_get_private_chat_is_symmetric() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = ChatRepository::new(pool);
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let created = repo.create_chat(&private_chat(a, b)).await.unwrap();
        repo.create_chat(&group_chat("trio", vec![a, b, c])).await.unwrap();

        assert_eq!(repo.get_private_chat(a, b).await.unwrap().id, created.id);
        assert_eq!(repo.get_private_chat(b, a).await.unwrap().id, created.id);
        assert!(matches!(
            repo.get_private_chat(a, c).await.unwrap_err(),
            StoreError::ChatNotFound
        ));
    }

    #[tokio::test]
    async fn test_get_user_chats_orders_and_aggregates_cursors() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = ChatRepository::new(pool.clone());
        let messages = MessageRepository::new(pool.clone());
        let me = Uuid::new_v4();
        let (x, y) = (Uuid::new_v4(), Uuid::new_v4());

        let older = repo.create_chat(&group_chat("older", vec![me, x, y])).await.unwrap();
        let newer = repo.create_chat(&private_chat(me, x)).await.unwrap();
        let foreign = repo.create_chat(&private_chat(x, y)).await.unwrap();

        set_updated_at(&pool, older.id, 1_000).await;
        set_updated_at(&pool, newer.id, 2_000).await;
        set_updated_at(&pool, foreign.id, 3_000).await;

        let base = from_millis(500).unwrap();
        messages.update_last_read_ts(older.id, x, base).await.unwrap();
        messages
            .update_last_read_ts(older.id, y, base + Duration::milliseconds(200))
            .await
            .unwrap();
        messages
            .update_last_read_ts(older.id, me, base + Duration::milliseconds(900))
            .await
            .unwrap();

        let chats = repo.get_user_chats(me, &UserChatsQuery::default()).await.unwrap();
        let ids: Vec<Uuid> = chats.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);

        let group = &chats[1];
        assert_eq!(group.last_read_by_me, Some(base + Duration::milliseconds(900)));
        assert_eq!(group.last_read_by_other, Some(base + Duration::milliseconds(200)));
        assert!(chats[0].last_read_by_other.is_none());
    }

    #[tokio::test]
    async fn test_get_user_chats_honours_count_and_updated_after() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = ChatRepository::new(pool.clone());
        let me = Uuid::new_v4();

        let mut ids = Vec::new();
        for i in 0..4 {
            let chat = repo.create_chat(&private_chat(me, Uuid::new_v4())).await.unwrap();
            set_updated_at(&pool, chat.id, 10_000 + i * 1_000).await;
            ids.push(chat.id);
        }

        let limited = repo
            .get_user_chats(me, &UserChatsQuery { count: Some(2), updated_after: None })
            .await
            .unwrap();
        assert_eq!(limited.iter().map(|c| c.id).collect::<Vec<_>>(), vec![ids[3], ids[2]]);

        let since = repo
            .get_user_chats(
                me,
                &UserChatsQuery {
                    count: None,
                    updated_after: Some(from_millis(11_000).unwrap()),
                },
            )
            .await
            .unwrap();
        assert_eq!(since.iter().map(|c| c.id).collect::<Vec<_>>(), vec![ids[3], ids[2]]);

        let unbounded = repo
            .get_user_chats(me, &UserChatsQuery { count: Some(0), updated_after: None })
            .await
            .unwrap();
        assert_eq!(unbounded.len(), 4);
    }

    #[tokio::test]
    async fn test_membership_transitions() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = ChatRepository::new(pool);
        let (owner, guest) = (Uuid::new_v4(), Uuid::new_v4());

        let chat = repo.create_chat(&group_chat("club", vec![owner])).await.unwrap();
        assert!(!repo.is_participant(chat.id, guest).await.unwrap());

        repo.join_chat(chat.id, guest).await.unwrap();
        assert!(repo.is_participant(chat.id, guest).await.unwrap());
        assert!(matches!(
            repo.join_chat(chat.id, guest).await.unwrap_err(),
            StoreError::ParticipantAlreadyExists
        ));

        assert!(!repo.leave_chat(chat.id, guest).await.unwrap());
        assert!(matches!(
            repo.leave_chat(chat.id, guest).await.unwrap_err(),
            StoreError::ParticipantNotFound
        ));

        // Rejoining after leaving is allowed
        repo.join_chat(chat.id, guest).await.unwrap();

        assert!(matches!(
            repo.join_chat(Uuid::new_v4(), guest).await.unwrap_err(),
            StoreError::ChatNotFound
        ));
    }

    #[tokio::test]
    async fn test_last_member_leaving_drops_the_chat() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = ChatRepository::new(pool.clone());
        let messages = MessageRepository::new(pool.clone());
        let (owner, guest) = (Uuid::new_v4(), Uuid::new_v4());

        let chat = repo
            .create_chat(&group_chat("club", vec![owner, guest]))
            .await
            .unwrap();
        let message = messages
            .save_message(&text_message(chat.id, owner, "last words"))
            .await
            .unwrap();

        assert!(!repo.leave_chat(chat.id, guest).await.unwrap());
        assert!(repo.exists(chat.id).await.unwrap());

        assert!(repo.leave_chat(chat.id, owner).await.unwrap());
        assert!(!repo.exists(chat.id).await.unwrap());
        assert!(matches!(
            messages.get_message_by_id(message.id).await.unwrap_err(),
            StoreError::MessageNotFound
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_join_racing_last_leave_never_loses_the_member() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = ChatRepository::new(pool);

        for _ in 0..20 {
            let (owner, newcomer) = (Uuid::new_v4(), Uuid::new_v4());
            let chat = repo.create_chat(&group_chat("club", vec![owner])).await.unwrap();

            let (left, joined) = tokio::join!(
                repo.leave_chat(chat.id, owner),
                repo.join_chat(chat.id, newcomer)
            );
            let dropped = left.unwrap();

            match joined {
                Ok(_) => {
                    assert!(!dropped, "a chat with a fresh member must survive");
                    assert!(repo.is_participant(chat.id, newcomer).await.unwrap());
                }
                Err(StoreError::ChatNotFound) => {
                    assert!(dropped);
                    assert!(!repo.exists(chat.id).await.unwrap());
                }
                Err(other) => panic!("unexpected join error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_delete_chat_removes_dependents() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = ChatRepository::new(pool.clone());
        let messages = MessageRepository::new(pool.clone());
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let chat = repo.create_chat(&private_chat(a, b)).await.unwrap();
        let message = messages.save_message(&text_message(chat.id, a, "bye")).await.unwrap();

        repo.delete_chat(chat.id).await.unwrap();

        assert!(!repo.exists(chat.id).await.unwrap());
        assert!(matches!(
            repo.get_chat_participants(chat.id).await.unwrap_err(),
            StoreError::ChatNotFound
        ));
        assert!(matches!(
            messages.get_message_by_id(message.id).await.unwrap_err(),
            StoreError::MessageNotFound
        ));
        assert!(matches!(
            repo.delete_chat(chat.id).await.unwrap_err(),
            StoreError::ChatNotFound
        ));
    }

    #[tokio::test]
    async fn test_num_unread_chats_uses_strict_comparison() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = ChatRepository::new(pool.clone());
        let messages = MessageRepository::new(pool.clone());
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let chat = repo.create_chat(&private_chat(a, b)).await.unwrap();
        assert_eq!(repo.get_num_unread_chats(b).await.unwrap(), 0);

        messages.save_message(&text_message(chat.id, a, "hi")).await.unwrap();
        assert_eq!(repo.get_num_unread_chats(b).await.unwrap(), 1);
        // The sender never sees their own message as unread
        assert_eq!(repo.get_num_unread_chats(a).await.unwrap(), 0);

        let updated_at = repo.get_chat(chat.id).await.unwrap().updated_at;

        messages
            .update_last_read_ts(chat.id, b, updated_at - Duration::milliseconds(1))
            .await
            .unwrap();
        assert_eq!(repo.get_num_unread_chats(b).await.unwrap(), 1);

        messages.update_last_read_ts(chat.id, b, updated_at).await.unwrap();
        assert_eq!(repo.get_num_unread_chats(b).await.unwrap(), 0);
    }
}
