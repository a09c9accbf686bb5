//! Chat entity definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::Message;
use crate::types::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub chat_type: ChatType,
    /// Group chats only
    pub name: Option<String>,
    /// Group chats only
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Filled in by enrichment, never by the chat store
    pub last_message: Option<Message>,
    pub last_read_by_me: Option<DateTime<Utc>>,
    /// Latest cursor among every participant except the caller
    pub last_read_by_other: Option<DateTime<Utc>>,
}

impl Chat {
    pub fn is_group(&self) -> bool {
        matches!(self.chat_type, ChatType::Group)
    }

    pub fn is_private(&self) -> bool {
        matches!(self.chat_type, ChatType::Private)
    }
}

/// Insert payload for the chat store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChat {
    pub chat_type: ChatType,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    /// Every initial participant, creator included
    pub participant_ids: Vec<Uuid>,
}

/// Paging options for a user's chat list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserChatsQuery {
    /// Maximum number of chats to return; `None` or zero returns all of them
    pub count: Option<u32>,
    /// Only chats updated strictly after this instant
    pub updated_after: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    Private,
    Group,
}

impl ChatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatType::Private => "private",
            ChatType::Group => "group",
        }
    }
}

impl FromStr for ChatType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "private" => Ok(ChatType::Private),
            "group" => Ok(ChatType::Group),
            other => Err(StoreError::invalid_chat_type(other)),
        }
    }
}

impl fmt::Display for ChatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
