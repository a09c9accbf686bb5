//! Message service for sending, paging and read-receipt bookkeeping.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use murmur_config::ChatsConfig;
use murmur_database::{ChatStore, Message, MessageStore, NewMessage, StoreError};
use tracing::{debug, info};
use uuid::Uuid;

use super::store_failure;
use crate::types::{ChatError, ChatResult, SendMessageRequest};
use crate::utils::{MessageValidator, Validator};

/// Service for message operations. Every read is gated on chat membership.
pub struct MessageService {
    chats: Arc<dyn ChatStore>,
    messages: Arc<dyn MessageStore>,
    validator: Arc<dyn MessageValidator>,
    config: ChatsConfig,
}

impl MessageService {
    pub fn new(chats: Arc<dyn ChatStore>, messages: Arc<dyn MessageStore>, config: ChatsConfig) -> Self {
        let config = config.sanitised();
        Self {
            chats,
            messages,
            validator: Arc::new(Validator::new(&config)),
            config,
        }
    }

    /// Replace the message validator
    pub fn with_validator(mut self, validator: Arc<dyn MessageValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Validate and persist a message from `sender_id`
    pub async fn send_message(&self, sender_id: Uuid, request: SendMessageRequest) -> ChatResult<Message> {
        self.validator.validate_message(&request)?;

        let chat = self
            .chats
            .get_chat(request.chat_id)
            .await
            .map_err(store_failure("get_chat", request.chat_id))?;

        self.ensure_participant(chat.id, sender_id).await?;

        let receiver_id = if chat.is_private() {
            let participants = self
                .chats
                .get_chat_participants(chat.id)
                .await
                .map_err(store_failure("get_chat_participants", chat.id))?;
            participants
                .into_iter()
                .map(|p| p.user_id)
                .find(|id| *id != sender_id)
        } else {
            None
        };

        let message = self
            .messages
            .save_message(&NewMessage {
                chat_id: chat.id,
                sender_id,
                receiver_id,
                text: request.text,
                attachments: request.attachments,
            })
            .await
            .map_err(store_failure("save_message", chat.id))?;

        info!(
            message_id = %message.id,
            chat_id = %chat.id,
            sender_id = %sender_id,
            "message sent"
        );
        Ok(message)
    }

    /// Page backwards through a chat: up to `count` messages strictly older
    /// than `before`, newest first. A `count` of zero selects the default page size.
    pub async fn get_messages_for_chat_older(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
        count: u32,
        before: DateTime<Utc>,
    ) -> ChatResult<Vec<Message>> {
        self.ensure_participant(chat_id, user_id).await?;

        let count = self.page_size(count);
        let messages = self
            .messages
            .get_messages_for_chat_older(chat_id, count, before)
            .await
            .map_err(store_failure("get_messages_for_chat_older", chat_id))?;

        debug!(chat_id = %chat_id, user_id = %user_id, count, returned = messages.len(), "fetched messages");
        Ok(messages)
    }

    pub async fn get_message_by_id(&self, message_id: Uuid, requester_id: Uuid) -> ChatResult<Message> {
        let message = self
            .messages
            .get_message_by_id(message_id)
            .await
            .map_err(store_failure("get_message_by_id", message_id))?;

        self.ensure_participant(message.chat_id, requester_id).await?;
        Ok(message)
    }

    pub async fn delete_message(&self, message_id: Uuid) -> ChatResult<()> {
        if message_id.is_nil() {
            return Err(ChatError::validation("message id cannot be empty"));
        }

        self.messages
            .delete_message(message_id)
            .await
            .map_err(store_failure("delete_message", message_id))?;

        info!(message_id = %message_id, "message deleted");
        Ok(())
    }

    /// Advance the user's read cursor; an older `ts` leaves it in place.
    /// Returns the cursor now in effect.
    pub async fn update_last_read_ts(
        &self,
        chat_id: Uuid,
        user_id: Uuid,
        ts: DateTime<Utc>,
    ) -> ChatResult<DateTime<Utc>> {
        let effective = self
            .messages
            .update_last_read_ts(chat_id, user_id, ts)
            .await
            .map_err(|err| participant_error(err, chat_id))?;

        debug!(chat_id = %chat_id, user_id = %user_id, cursor = %effective, "read cursor updated");
        Ok(effective)
    }

    /// `None` until the user reads the chat for the first time
    pub async fn get_last_read_ts(&self, chat_id: Uuid, user_id: Uuid) -> ChatResult<Option<DateTime<Utc>>> {
        self.messages
            .get_last_read_ts(chat_id, user_id)
            .await
            .map_err(|err| participant_error(err, chat_id))
    }

    pub async fn get_num_unread_messages(&self, chat_id: Uuid, user_id: Uuid) -> ChatResult<u64> {
        self.messages
            .get_num_unread_messages(chat_id, user_id)
            .await
            .map_err(|err| participant_error(err, chat_id))
    }

    async fn ensure_participant(&self, chat_id: Uuid, user_id: Uuid) -> ChatResult<()> {
        let is_participant = self
            .chats
            .is_participant(chat_id, user_id)
            .await
            .map_err(store_failure("is_participant", chat_id))?;

        if is_participant {
            Ok(())
        } else {
            Err(ChatError::NotParticipant)
        }
    }

    fn page_size(&self, requested: u32) -> u32 {
        match requested {
            0 => self.config.default_page_size,
            n => n.min(self.config.max_page_size),
        }
    }
}

/// Cursor operations report a missing membership row as `NotParticipant`
fn participant_error(err: StoreError, chat_id: Uuid) -> ChatError {
    match err {
        StoreError::ParticipantNotFound => ChatError::NotParticipant,
        other => store_failure("read_cursor", chat_id)(other),
    }
}
