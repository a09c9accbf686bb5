//! Chat service for managing chat operations.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use murmur_config::{ChatsConfig, EnrichmentFailurePolicy};
use murmur_database::{
    Chat, ChatStore, ChatType, MessageStore, NewChat, Participant, StoreError, UserChatsQuery,
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{store_failure, upstream_failure};
use crate::collaborators::{FileService, ProfileLookup};
use crate::types::{ChatDetails, ChatError, ChatResult, CreateChatInfo};
use crate::utils::{ChatCreationValidator, Validator};

/// Service for chat lifecycle, membership and chat-list enrichment
pub struct ChatService {
    chats: Arc<dyn ChatStore>,
    messages: Arc<dyn MessageStore>,
    profiles: Arc<dyn ProfileLookup>,
    files: Arc<dyn FileService>,
    validator: Arc<dyn ChatCreationValidator>,
    config: ChatsConfig,
}

impl ChatService {
    /// Create a new chat service using the config-driven [`Validator`]
    pub fn new(
        chats: Arc<dyn ChatStore>,
        messages: Arc<dyn MessageStore>,
        profiles: Arc<dyn ProfileLookup>,
        files: Arc<dyn FileService>,
        config: ChatsConfig,
    ) -> Self {
        let config = config.sanitised();
        Self {
            chats,
            messages,
            profiles,
            files,
            validator: Arc::new(Validator::new(&config)),
            config,
        }
    }

    /// Replace the chat-creation validator
    pub fn with_validator(mut self, validator: Arc<dyn ChatCreationValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Create a new chat. The creator always becomes a participant.
    pub async fn create_chat(&self, creator_id: Uuid, info: CreateChatInfo) -> ChatResult<Chat> {
        let chat_type: ChatType = info
            .chat_type
            .parse()
            .map_err(|_| ChatError::invalid_chat_type(info.chat_type.trim()))?;

        self.validator.validate_chat_creation(creator_id, chat_type, &info)?;

        let mut participant_ids = vec![creator_id];
        for id in &info.member_ids {
            if !participant_ids.contains(id) {
                participant_ids.push(*id);
            }
        }

        let (name, avatar_url) = match chat_type {
            ChatType::Private => (None, None),
            ChatType::Group => {
                let avatar_url = match info.avatar {
                    Some(avatar) => Some(
                        self.files
                            .upload_file(avatar)
                            .await
                            .map_err(upstream_failure("file service", "create_chat"))?,
                    ),
                    None => None,
                };
                (info.name.map(|name| name.trim().to_string()), avatar_url)
            }
        };

        let chat = self
            .chats
            .create_chat(&NewChat {
                chat_type,
                name,
                avatar_url,
                participant_ids,
            })
            .await
            .map_err(store_failure("create_chat", creator_id))?;

        info!(chat_id = %chat.id, creator_id = %creator_id, chat_type = %chat_type, "chat created");
        Ok(chat)
    }

    /// Return the private chat between the two users, creating it if needed
    pub async fn get_or_create_private_chat(
        &self,
        creator_id: Uuid,
        counterpart_id: Uuid,
    ) -> ChatResult<Chat> {
        match self.chats.get_private_chat(creator_id, counterpart_id).await {
            Ok(chat) => return Ok(chat),
            Err(StoreError::ChatNotFound) => {}
            Err(err) => return Err(store_failure("get_private_chat", creator_id)(err)),
        }

        self.create_chat(creator_id, CreateChatInfo::private(counterpart_id))
            .await
    }

    /// List a user's chats, most recently updated first, each enriched with
    /// its other participants, their profiles and the last message.
    pub async fn get_user_chats(
        &self,
        user_id: Uuid,
        query: UserChatsQuery,
    ) -> ChatResult<Vec<ChatDetails>> {
        let chats = self
            .chats
            .get_user_chats(user_id, &query)
            .await
            .map_err(store_failure("get_user_chats", user_id))?;

        let total = chats.len();
        let mut slots: Vec<Option<ChatDetails>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);

        let mut enriched = stream::iter(chats.into_iter().enumerate())
            .map(|(index, chat)| async move { (index, self.enrich_chat(user_id, chat).await) })
            .buffer_unordered(self.config.enrichment_concurrency);

        while let Some((index, result)) = enriched.next().await {
            match result {
                Ok(details) => slots[index] = Some(details),
                Err(err) => match self.config.enrichment_failure_policy {
                    EnrichmentFailurePolicy::FailFast => {
                        error!(user_id = %user_id, error = %err, "chat enrichment failed");
                        return Err(err);
                    }
                    EnrichmentFailurePolicy::SkipFailed => {
                        warn!(user_id = %user_id, error = %err, "skipping chat that failed enrichment");
                    }
                },
            }
        }

        let details: Vec<ChatDetails> = slots.into_iter().flatten().collect();
        debug!(user_id = %user_id, requested = total, returned = details.len(), "enriched chat list");

        Ok(details)
    }

    async fn enrich_chat(&self, user_id: Uuid, mut chat: Chat) -> ChatResult<ChatDetails> {
        let chat_id = chat.id;

        let (participants, last_message) = tokio::try_join!(
            async {
                self.chats
                    .get_chat_participants(chat_id)
                    .await
                    .map_err(store_failure("get_chat_participants", chat_id))
            },
            async {
                self.messages
                    .get_last_message(chat_id)
                    .await
                    .map_err(store_failure("get_last_message", chat_id))
            },
        )?;

        let participants: Vec<Participant> = participants
            .into_iter()
            .filter(|p| p.user_id != user_id)
            .collect();

        let members = if participants.is_empty() {
            Vec::new()
        } else {
            let ids: Vec<Uuid> = participants.iter().map(|p| p.user_id).collect();
            self.profiles
                .get_public_users_info(&ids)
                .await
                .map_err(upstream_failure("profile lookup", "get_user_chats"))?
        };

        chat.last_message = last_message;

        Ok(ChatDetails {
            chat,
            participants,
            members,
        })
    }

    pub async fn get_chat(&self, chat_id: Uuid) -> ChatResult<Chat> {
        self.chats
            .get_chat(chat_id)
            .await
            .map_err(store_failure("get_chat", chat_id))
    }

    pub async fn get_private_chat(&self, user_a: Uuid, user_b: Uuid) -> ChatResult<Chat> {
        self.chats
            .get_private_chat(user_a, user_b)
            .await
            .map_err(store_failure("get_private_chat", format!("{user_a}/{user_b}")))
    }

    /// Delete a chat with all of its messages and participants
    pub async fn delete_chat(&self, chat_id: Uuid) -> ChatResult<()> {
        let exists = self
            .chats
            .exists(chat_id)
            .await
            .map_err(store_failure("exists", chat_id))?;
        if !exists {
            return Err(ChatError::chat_not_found(chat_id));
        }

        self.chats
            .delete_chat(chat_id)
            .await
            .map_err(store_failure("delete_chat", chat_id))?;

        info!(chat_id = %chat_id, "chat deleted");
        Ok(())
    }

    /// Add a user to a group chat
    pub async fn join_chat(&self, chat_id: Uuid, user_id: Uuid) -> ChatResult<Participant> {
        let chat = self.get_chat(chat_id).await?;
        if self.is_member(chat_id, user_id).await? {
            return Err(ChatError::AlreadyInChat);
        }
        if chat.is_private() {
            return Err(ChatError::invalid_chat_type(chat.chat_type.as_str()));
        }

        let participant = self
            .chats
            .join_chat(chat_id, user_id)
            .await
            .map_err(store_failure("join_chat", chat_id))?;

        info!(chat_id = %chat_id, user_id = %user_id, "user joined chat");
        Ok(participant)
    }

    /// Remove a user from a group chat; the last member leaving deletes it
    pub async fn leave_chat(&self, chat_id: Uuid, user_id: Uuid) -> ChatResult<()> {
        let chat = self.get_chat(chat_id).await?;
        if !self.is_member(chat_id, user_id).await? {
            return Err(ChatError::participant_not_found(user_id));
        }
        if chat.is_private() {
            return Err(ChatError::invalid_chat_type(chat.chat_type.as_str()));
        }

        let dropped = self
            .chats
            .leave_chat(chat_id, user_id)
            .await
            .map_err(store_failure("leave_chat", user_id))?;

        info!(chat_id = %chat_id, user_id = %user_id, "user left chat");
        if dropped {
            info!(chat_id = %chat_id, "deleted empty group chat");
        }
        Ok(())
    }

    async fn is_member(&self, chat_id: Uuid, user_id: Uuid) -> ChatResult<bool> {
        self.chats
            .is_participant(chat_id, user_id)
            .await
            .map_err(store_failure("is_participant", chat_id))
    }

    pub async fn get_chat_participants(&self, chat_id: Uuid) -> ChatResult<Vec<Participant>> {
        self.chats
            .get_chat_participants(chat_id)
            .await
            .map_err(store_failure("get_chat_participants", chat_id))
    }

    /// Number of chats holding a message the user has not read yet
    pub async fn get_num_unread_chats(&self, user_id: Uuid) -> ChatResult<u64> {
        self.chats
            .get_num_unread_chats(user_id)
            .await
            .map_err(store_failure("get_num_unread_chats", user_id))
    }
}
