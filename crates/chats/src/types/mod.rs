//! Shared types for the chat services.

pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::{ChatError, ChatResult};
pub use requests::{CreateChatInfo, FileUpload, SendMessageRequest};
pub use responses::{ChatDetails, ChatListItem, ConnectionInfo, MemberPresence, PublicUserInfo};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Parse a string-encoded id from the wire
pub fn parse_id(raw: &str) -> ChatResult<Uuid> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ChatError::validation("id cannot be empty"));
    }

    Uuid::parse_str(trimmed).map_err(|e| ChatError::validation(format!("invalid id {trimmed:?}: {e}")))
}

/// Parse a wire timestamp given as RFC 3339 or as epoch milliseconds
pub fn parse_timestamp(raw: &str) -> ChatResult<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(ms) = trimmed.parse::<i64>() {
        return DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| ChatError::validation(format!("timestamp out of range: {ms}")));
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| ChatError::validation(format!("invalid timestamp {trimmed:?}: {e}")))
}
