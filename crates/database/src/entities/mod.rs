//! Domain entities for the database layer

pub mod chat;
pub mod message;
pub mod participant;

pub use chat::{Chat, ChatType, NewChat, UserChatsQuery};
pub use message::{Attachment, Message, NewAttachment, NewMessage};
pub use participant::Participant;
