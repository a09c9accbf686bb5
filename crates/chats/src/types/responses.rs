//! View models returned by the chat services.

use chrono::{DateTime, Utc};
use murmur_database::{Chat, Participant};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public profile data served by the profile lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUserInfo {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Last activity the profile service knows about
    pub last_seen: Option<DateTime<Utc>>,
}

/// A live connection reported by the presence registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub user_id: Uuid,
    pub connected_at: DateTime<Utc>,
    pub device: Option<String>,
}

/// A chat after enrichment, before presence is applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatDetails {
    /// Carries `last_message` once enriched
    pub chat: Chat,
    /// Every participant except the requesting user
    pub participants: Vec<Participant>,
    /// Profiles for `participants`, in lookup order
    pub members: Vec<PublicUserInfo>,
}

impl ChatDetails {
    pub fn member(&self, user_id: Uuid) -> Option<&PublicUserInfo> {
        self.members.iter().find(|m| m.id == user_id)
    }
}

/// Presence for a single user, recomputed on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberPresence {
    pub user_id: Uuid,
    pub profile: Option<PublicUserInfo>,
    pub is_online: bool,
    /// Only set while offline
    pub last_seen: Option<DateTime<Utc>>,
}

/// One row of a user's chat list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatListItem {
    pub chat: Chat,
    pub members: Vec<MemberPresence>,
    /// True when any other participant is connected
    pub is_online: bool,
    pub last_seen: Option<DateTime<Utc>>,
    pub is_unread: bool,
}
