//! Storage seams consumed by the chat and message services.
//!
//! The sqlx repositories in [`crate::repos`] are the production
//! implementations; services hold these traits as `Arc<dyn _>` so tests can
//! substitute failing or slow stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entities::{Chat, Message, NewChat, NewMessage, Participant, UserChatsQuery};
use crate::types::StoreResult;

/// Persistence for chats, membership and per-participant read cursors
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Insert a chat together with its initial participants
    async fn create_chat(&self, chat: &NewChat) -> StoreResult<Chat>;

    /// Chats the user participates in, most recently updated first, with
    /// `last_read_by_me` and `last_read_by_other` filled in
    async fn get_user_chats(&self, user_id: Uuid, query: &UserChatsQuery) -> StoreResult<Vec<Chat>>;

    async fn get_chat(&self, chat_id: Uuid) -> StoreResult<Chat>;

    /// The private chat between two users, independent of argument order
    async fn get_private_chat(&self, user_a: Uuid, user_b: Uuid) -> StoreResult<Chat>;

    async fn exists(&self, chat_id: Uuid) -> StoreResult<bool>;

    /// Remove the chat and every row that depends on it
    async fn delete_chat(&self, chat_id: Uuid) -> StoreResult<()>;

    async fn is_participant(&self, chat_id: Uuid, user_id: Uuid) -> StoreResult<bool>;

    async fn join_chat(&self, chat_id: Uuid, user_id: Uuid) -> StoreResult<Participant>;

    /// Removes the participant and, when nobody is left, the chat itself in
    /// the same transaction. Returns true when the chat was dropped.
    async fn leave_chat(&self, chat_id: Uuid, user_id: Uuid) -> StoreResult<bool>;

    /// Fails with `ChatNotFound` when the chat has no participant rows
    async fn get_chat_participants(&self, chat_id: Uuid) -> StoreResult<Vec<Participant>>;

    /// Chats whose latest message came from someone else and whose cursor
    /// for this user is older than the chat's last update
    async fn get_num_unread_chats(&self, user_id: Uuid) -> StoreResult<u64>;
}

/// Persistence for messages and read cursors
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert the message and advance the chat's `updated_at`
    async fn save_message(&self, message: &NewMessage) -> StoreResult<Message>;

    /// Up to `count` messages created strictly before `before`, newest first
    async fn get_messages_for_chat_older(
        &self,
        chat_id: Uuid,
        count: u32,
        before: DateTime<Utc>,
    ) -> StoreResult<Vec<Message>>;

    async fn get_message_by_id(&self, message_id: Uuid) -> StoreResult<Message>;

    async fn get_last_message(&self, chat_id: Uuid) -> StoreResult<Option<Message>>;

    async fn delete_message(&self, message_id: Uuid) -> StoreResult<()>;

    /// Move the cursor forward to `ts`; an older `ts` leaves it unchanged.
    /// Returns the effective cursor.
    async fn update_last_read_ts(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
        ts: DateTime<Utc>,
    ) -> StoreResult<DateTime<Utc>>;

    /// `None` when the participant has never read the chat
    async fn get_last_read_ts(&self, chat_id: Uuid, user_id: Uuid) -> StoreResult<Option<DateTime<Utc>>>;

    async fn get_num_unread_messages(&self, chat_id: Uuid, user_id: Uuid) -> StoreResult<u64>;
}
