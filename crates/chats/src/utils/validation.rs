//! Request validation run before any storage call.

use murmur_config::ChatsConfig;
use murmur_database::ChatType;
use uuid::Uuid;

use crate::types::{ChatError, ChatResult, CreateChatInfo, SendMessageRequest};

/// Checks a message body before it is persisted
pub trait MessageValidator: Send + Sync {
    fn validate_message(&self, request: &SendMessageRequest) -> ChatResult<()>;
}

/// Checks a chat-creation request once its type has been parsed
pub trait ChatCreationValidator: Send + Sync {
    fn validate_chat_creation(
        &self,
        creator_id: Uuid,
        chat_type: ChatType,
        info: &CreateChatInfo,
    ) -> ChatResult<()>;
}

/// Default validator driven by the configured limits
#[derive(Debug, Clone)]
pub struct Validator {
    max_message_length: usize,
    max_attachments: usize,
    max_group_name_length: usize,
}

impl Validator {
    pub fn new(config: &ChatsConfig) -> Self {
        Self {
            max_message_length: config.max_message_length,
            max_attachments: config.max_attachments,
            max_group_name_length: config.max_group_name_length,
        }
    }

    /// Validate message text; an empty body is allowed only alongside attachments
    pub fn message_text(&self, text: &str, has_attachments: bool) -> ChatResult<()> {
        if text.trim().is_empty() && !has_attachments {
            return Err(ChatError::validation(
                "message must contain text or at least one attachment",
            ));
        }

        let length = text.chars().count();
        if length > self.max_message_length {
            return Err(ChatError::validation(format!(
                "message too long ({length} characters, max {})",
                self.max_message_length
            )));
        }

        Ok(())
    }

    /// Validate a group chat name
    pub fn group_name(&self, name: Option<&str>) -> ChatResult<()> {
        let name = name.map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return Err(ChatError::invalid_creation_info("group chats need a name"));
        }

        if name.chars().count() > self.max_group_name_length {
            return Err(ChatError::invalid_creation_info(format!(
                "group name too long (max {} characters)",
                self.max_group_name_length
            )));
        }

        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&ChatsConfig::default())
    }
}

impl MessageValidator for Validator {
    fn validate_message(&self, request: &SendMessageRequest) -> ChatResult<()> {
        if request.chat_id.is_nil() {
            return Err(ChatError::validation("chat id cannot be empty"));
        }

        self.message_text(&request.text, !request.attachments.is_empty())?;

        if request.attachments.len() > self.max_attachments {
            return Err(ChatError::validation(format!(
                "too many attachments ({}, max {})",
                request.attachments.len(),
                self.max_attachments
            )));
        }

        for attachment in &request.attachments {
            if attachment.url.trim().is_empty() {
                return Err(ChatError::validation("attachment url cannot be empty"));
            }
            if attachment.size_bytes < 0 {
                return Err(ChatError::validation("attachment size cannot be negative"));
            }
        }

        Ok(())
    }
}

impl ChatCreationValidator for Validator {
    fn validate_chat_creation(
        &self,
        creator_id: Uuid,
        chat_type: ChatType,
        info: &CreateChatInfo,
    ) -> ChatResult<()> {
        if info.member_ids.iter().any(Uuid::is_nil) {
            return Err(ChatError::invalid_creation_info("member ids cannot be empty"));
        }

        match chat_type {
            ChatType::Private => {
                let mut counterparts = info.member_ids.iter().filter(|id| **id != creator_id);
                let first = counterparts.next();
                if first.is_none() {
                    return Err(ChatError::invalid_creation_info(
                        "a private chat needs a counterpart other than the creator",
                    ));
                }
                if counterparts.any(|id| Some(id) != first) {
                    return Err(ChatError::invalid_creation_info(
                        "a private chat has exactly one counterpart",
                    ));
                }
                Ok(())
            }
            ChatType::Group => {
                self.group_name(info.name.as_deref())?;
                if let Some(avatar) = &info.avatar {
                    if avatar.data.is_empty() {
                        return Err(ChatError::invalid_creation_info("avatar file is empty"));
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileUpload;
    use murmur_database::NewAttachment;

    fn attachment(url: &str) -> NewAttachment {
        NewAttachment {
            url: url.to_string(),
            content_type: "image/png".to_string(),
            size_bytes: 1,
        }
    }

    #[test]
    fn test_message_needs_text_or_attachment() {
        let validator = Validator::default();
        let chat_id = Uuid::new_v4();

        assert!(validator
            .validate_message(&SendMessageRequest::text(chat_id, "   "))
            .is_err());
        assert!(validator
            .validate_message(&SendMessageRequest::text(chat_id, "hi"))
            .is_ok());

        let only_attachment = SendMessageRequest {
            chat_id,
            text: String::new(),
            attachments: vec![attachment("https://cdn.example.com/a.png")],
        };
        assert!(validator.validate_message(&only_attachment).is_ok());
    }

    #[test]
    fn test_message_limits_come_from_config() {
        let validator = Validator::new(&ChatsConfig {
            max_message_length: 5,
            max_attachments: 1,
            ..ChatsConfig::default()
        });
        let chat_id = Uuid::new_v4();

        assert!(validator
            .validate_message(&SendMessageRequest::text(chat_id, "hello"))
            .is_ok());
        // Length counts characters, not bytes
        assert!(validator
            .validate_message(&SendMessageRequest::text(chat_id, "héllo"))
            .is_ok());
        assert!(validator
            .validate_message(&SendMessageRequest::text(chat_id, "hello!"))
            .is_err());

        let two = SendMessageRequest {
            chat_id,
            text: "x".to_string(),
            attachments: vec![attachment("a"), attachment("b")],
        };
        assert!(matches!(
            validator.validate_message(&two),
            Err(ChatError::Validation { .. })
        ));
    }

    #[test]
    fn test_private_chat_needs_single_distinct_counterpart() {
        let validator = Validator::default();
        let (me, you, them) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let ok = CreateChatInfo::private(you);
        assert!(validator.validate_chat_creation(me, ChatType::Private, &ok).is_ok());

        let with_self = CreateChatInfo {
            member_ids: vec![me, you, you],
            ..CreateChatInfo::private(you)
        };
        assert!(validator.validate_chat_creation(me, ChatType::Private, &with_self).is_ok());

        let only_self = CreateChatInfo::private(me);
        assert!(matches!(
            validator.validate_chat_creation(me, ChatType::Private, &only_self),
            Err(ChatError::InvalidChatCreationInfo { .. })
        ));

        let crowd = CreateChatInfo {
            member_ids: vec![you, them],
            ..CreateChatInfo::private(you)
        };
        assert!(validator.validate_chat_creation(me, ChatType::Private, &crowd).is_err());
    }

    #[test]
    fn test_group_chat_rules() {
        let validator = Validator::new(&ChatsConfig {
            max_group_name_length: 4,
            ..ChatsConfig::default()
        });
        let me = Uuid::new_v4();

        assert!(validator
            .validate_chat_creation(me, ChatType::Group, &CreateChatInfo::group("club", vec![]))
            .is_ok());
        assert!(validator
            .validate_chat_creation(me, ChatType::Group, &CreateChatInfo::group("  ", vec![]))
            .is_err());
        assert!(validator
            .validate_chat_creation(me, ChatType::Group, &CreateChatInfo::group("clubs", vec![]))
            .is_err());

        let empty_avatar = CreateChatInfo::group("club", vec![])
            .with_avatar(FileUpload::new("a.png", "image/png", Vec::<u8>::new()));
        assert!(validator
            .validate_chat_creation(me, ChatType::Group, &empty_avatar)
            .is_err());
    }
}
