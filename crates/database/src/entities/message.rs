//! Message entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    /// Set for private chats only
    pub receiver_id: Option<Uuid>,
    pub text: String,
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    pub url: String,
    pub content_type: String,
    pub size_bytes: i64,
}

/// Insert payload for the message store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Option<Uuid>,
    pub text: String,
    pub attachments: Vec<NewAttachment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttachment {
    pub url: String,
    pub content_type: String,
    pub size_bytes: i64,
}
