//! Error types for the chat services.

use murmur_database::StoreError;
use thiserror::Error;

/// Result type alias for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Main error type for the chat services
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid chat type: {chat_type}")]
    InvalidChatType { chat_type: String },

    #[error("Invalid chat creation info: {reason}")]
    InvalidChatCreationInfo { reason: String },

    #[error("User is already a participant of this chat")]
    AlreadyInChat,

    #[error("User is not a participant of this chat")]
    NotParticipant,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{service} failed: {source:#}")]
    Upstream {
        service: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ChatError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn chat_not_found(id: impl ToString) -> Self {
        Self::not_found("chat", id)
    }

    pub fn message_not_found(id: impl ToString) -> Self {
        Self::not_found("message", id)
    }

    pub fn participant_not_found(id: impl ToString) -> Self {
        Self::not_found("participant", id)
    }

    pub fn invalid_chat_type(chat_type: impl Into<String>) -> Self {
        Self::InvalidChatType {
            chat_type: chat_type.into(),
        }
    }

    pub fn invalid_creation_info(reason: impl Into<String>) -> Self {
        Self::InvalidChatCreationInfo {
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn upstream(service: &'static str, source: anyhow::Error) -> Self {
        Self::Upstream { service, source }
    }

    /// Translate a store error, attaching the id the caller asked about.
    pub fn from_store(err: StoreError, id: impl ToString) -> Self {
        match err {
            StoreError::ChatNotFound => Self::chat_not_found(id),
            StoreError::MessageNotFound => Self::message_not_found(id),
            StoreError::ParticipantNotFound => Self::participant_not_found(id),
            StoreError::ParticipantAlreadyExists => Self::AlreadyInChat,
            StoreError::InvalidChatType { chat_type } => Self::InvalidChatType { chat_type },
            other => Self::Storage(other),
        }
    }

    /// HTTP-equivalent status for the transport layer
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::AlreadyInChat
            | Self::InvalidChatType { .. }
            | Self::InvalidChatCreationInfo { .. }
            | Self::Validation { .. } => 400,
            Self::NotParticipant => 403,
            Self::Upstream { .. } | Self::Storage(_) => 500,
        }
    }

    /// True for errors raised by a dependency rather than by the request
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}
