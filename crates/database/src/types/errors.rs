//! Error types for the database layer

use thiserror::Error;

/// Setup errors raised while preparing the pool or applying migrations
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Errors raised by the chat and message stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Chat not found")]
    ChatNotFound,

    #[error("Message not found")]
    MessageNotFound,

    #[error("Participant not found")]
    ParticipantNotFound,

    #[error("Participant already exists")]
    ParticipantAlreadyExists,

    #[error("Invalid chat type: {chat_type}")]
    InvalidChatType { chat_type: String },

    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn invalid_chat_type(chat_type: impl Into<String>) -> Self {
        Self::InvalidChatType {
            chat_type: chat_type.into(),
        }
    }

    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            message: message.into(),
        }
    }
}

impl From<uuid::Error> for StoreError {
    fn from(err: uuid::Error) -> Self {
        Self::InvalidRecord {
            message: format!("UUID error: {}", err),
        }
    }
}
