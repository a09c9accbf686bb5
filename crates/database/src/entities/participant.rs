//! Participant entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A (chat, user) membership row carrying the user's read cursor.
///
/// Every message with `created_at <= last_read` counts as read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub chat_id: Uuid,
    pub user_id: Uuid,
    pub last_read: Option<DateTime<Utc>>,
    pub joined_at: DateTime<Utc>,
}
