//! Business logic layer for chats and messages.

pub mod chat_service;
pub mod message_service;

pub use chat_service::ChatService;
pub use message_service::MessageService;

use murmur_database::StoreError;
use tracing::error;

use crate::types::ChatError;

/// Map a store error for `operation`, logging it when it is not the caller's fault.
pub(crate) fn store_failure(
    operation: &'static str,
    id: impl ToString,
) -> impl FnOnce(StoreError) -> ChatError {
    let id = id.to_string();
    move |err| {
        let err = ChatError::from_store(err, &id);
        if err.is_internal() {
            error!(operation, id = %id, error = %err, "chat storage call failed");
        }
        err
    }
}

/// Wrap a collaborator failure, logging it at the service boundary.
pub(crate) fn upstream_failure(
    service: &'static str,
    operation: &'static str,
) -> impl FnOnce(anyhow::Error) -> ChatError {
    move |source| {
        error!(service, operation, error = %format!("{source:#}"), "collaborator call failed");
        ChatError::upstream(service, source)
    }
}
