//! Presence fusion: combines enriched chats with live connection state.
//!
//! Online status always comes from the [`PresenceRegistry`] at request time.
//! Persisted data only contributes the "last seen" fallback shown while a
//! user is offline, and nothing computed here is written back.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use murmur_config::ChatsConfig;
use murmur_database::Chat;
use tracing::debug;
use uuid::Uuid;

use crate::collaborators::PresenceRegistry;
use crate::services::upstream_failure;
use crate::types::{ChatDetails, ChatListItem, ChatResult, ConnectionInfo, MemberPresence, PublicUserInfo};

/// True when the newest message came from someone else and the user's
/// cursor is older than the chat's last update.
pub fn is_unread(user_id: Uuid, chat: &Chat) -> bool {
    let from_someone_else = chat
        .last_message
        .as_ref()
        .is_some_and(|message| message.sender_id != user_id);

    from_someone_else
        && chat
            .last_read_by_me
            .map_or(true, |last_read| last_read < chat.updated_at)
}

pub struct PresenceFusion {
    registry: Arc<dyn PresenceRegistry>,
    concurrency: usize,
}

impl PresenceFusion {
    pub fn new(registry: Arc<dyn PresenceRegistry>, config: &ChatsConfig) -> Self {
        Self {
            registry,
            concurrency: config.enrichment_concurrency.max(1),
        }
    }

    /// Turn enriched chats into list items for `user_id`, keeping their order
    pub async fn fuse(&self, user_id: Uuid, chats: Vec<ChatDetails>) -> ChatResult<Vec<ChatListItem>> {
        let mut seen = HashSet::new();
        let mut member_ids = Vec::new();
        for details in &chats {
            for participant in &details.participants {
                if participant.user_id != user_id && seen.insert(participant.user_id) {
                    member_ids.push(participant.user_id);
                }
            }
        }

        let connections = self.connections(member_ids).await?;

        let items = chats
            .into_iter()
            .map(|details| fuse_chat(user_id, details, &connections))
            .collect();

        Ok(items)
    }

    /// Presence for a single profile view
    pub async fn user_presence(&self, profile: PublicUserInfo) -> ChatResult<MemberPresence> {
        let connection = self
            .registry
            .is_connected(profile.id)
            .await
            .map_err(upstream_failure("presence registry", "user_presence"))?;

        let is_online = connection.is_some();
        Ok(MemberPresence {
            user_id: profile.id,
            last_seen: if is_online { None } else { profile.last_seen },
            profile: Some(profile),
            is_online,
        })
    }

    async fn connections(&self, user_ids: Vec<Uuid>) -> ChatResult<HashMap<Uuid, Option<ConnectionInfo>>> {
        let checked = user_ids.len();
        let registry = &self.registry;

        let connections: HashMap<Uuid, Option<ConnectionInfo>> = stream::iter(user_ids)
            .map(|id| async move {
                registry
                    .is_connected(id)
                    .await
                    .map(|connection| (id, connection))
                    .map_err(upstream_failure("presence registry", "fuse"))
            })
            .buffer_unordered(self.concurrency)
            .try_collect()
            .await?;

        debug!(
            checked,
            online = connections.values().filter(|c| c.is_some()).count(),
            "resolved live presence"
        );
        Ok(connections)
    }
}

fn fuse_chat(
    user_id: Uuid,
    details: ChatDetails,
    connections: &HashMap<Uuid, Option<ConnectionInfo>>,
) -> ChatListItem {
    let private = details.chat.is_private();
    let members: Vec<MemberPresence> = details
        .participants
        .iter()
        .filter(|p| p.user_id != user_id)
        .map(|participant| {
            let profile = details.member(participant.user_id).cloned();
            let is_online = matches!(connections.get(&participant.user_id), Some(Some(_)));

            let last_seen = if is_online {
                None
            } else {
                let from_profile = profile.as_ref().and_then(|p| p.last_seen);
                // Private chats fall back to the counterpart's read cursor
                if private {
                    from_profile.or(participant.last_read)
                } else {
                    from_profile
                }
            };

            MemberPresence {
                user_id: participant.user_id,
                profile,
                is_online,
                last_seen,
            }
        })
        .collect();

    let is_online = members.iter().any(|m| m.is_online);
    let last_seen: Option<DateTime<Utc>> = if is_online {
        None
    } else {
        members.iter().filter_map(|m| m.last_seen).max()
    };

    let chat = details.chat;
    ChatListItem {
        is_unread: is_unread(user_id, &chat),
        chat,
        members,
        is_online,
        last_seen,
    }
}
