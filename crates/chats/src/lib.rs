//! # Murmur Chats Crate
//!
//! Business logic for the chat core: chat lifecycle and membership, message
//! paging and read receipts, and the chat-list pipeline that enriches stored
//! chats and fuses them with live presence.
//!
//! ## Architecture
//!
//! - **Services**: [`ChatService`] and [`MessageService`] over the
//!   `murmur-database` store traits
//! - **Collaborators**: profile, presence and file services owned elsewhere
//! - **Presence**: [`PresenceFusion`] turns enriched chats into list items
//! - **Types**: requests, view models and [`ChatError`]
//! - **Utils**: request validators
//!
//! ## Usage
//!
//! ```rust,ignore
//! use murmur_chats::{ChatService, PresenceFusion};
//! use murmur_database::UserChatsQuery;
//!
//! let details = chat_service.get_user_chats(user_id, UserChatsQuery::default()).await?;
//! let items = presence.fuse(user_id, details).await?;
//! ```

pub mod collaborators;
pub mod presence;
pub mod services;
pub mod types;
pub mod utils;

pub use collaborators::{FileService, PresenceRegistry, ProfileLookup};
pub use presence::{is_unread, PresenceFusion};
pub use services::{ChatService, MessageService};
pub use types::{
    parse_id, parse_timestamp, ChatDetails, ChatError, ChatListItem, ChatResult, ConnectionInfo,
    CreateChatInfo, FileUpload, MemberPresence, PublicUserInfo, SendMessageRequest,
};
pub use utils::{ChatCreationValidator, MessageValidator, Validator};
