//! Request payloads accepted by the chat services.

use bytes::Bytes;
use murmur_database::NewAttachment;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw file handed to the [`FileService`](crate::FileService) for storage
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Request to create a new chat.
///
/// `chat_type` stays a string until the service parses it so that unknown
/// types surface as `InvalidChatType` rather than a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateChatInfo {
    pub chat_type: String,
    pub name: Option<String>,
    #[serde(skip)]
    pub avatar: Option<FileUpload>,
    /// Members besides the creator
    #[serde(default)]
    pub member_ids: Vec<Uuid>,
}

impl CreateChatInfo {
    pub fn private(counterpart_id: Uuid) -> Self {
        Self {
            chat_type: "private".to_string(),
            member_ids: vec![counterpart_id],
            ..Self::default()
        }
    }

    pub fn group(name: impl Into<String>, member_ids: Vec<Uuid>) -> Self {
        Self {
            chat_type: "group".to_string(),
            name: Some(name.into()),
            member_ids,
            ..Self::default()
        }
    }

    pub fn with_avatar(mut self, avatar: FileUpload) -> Self {
        self.avatar = Some(avatar);
        self
    }
}

/// Request to append a message to a chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub chat_id: Uuid,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<NewAttachment>,
}

impl SendMessageRequest {
    pub fn text(chat_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            attachments: Vec::new(),
        }
    }
}
