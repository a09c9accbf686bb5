//! Services owned by other parts of the platform.
//!
//! The chat core only talks to them through these traits, so a deployment
//! can back them with RPC clients while tests use in-memory stubs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::types::{ConnectionInfo, FileUpload, PublicUserInfo};

/// Batch resolution of user ids to public profile data
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    /// Unknown ids are left out of the result rather than failing the call
    async fn get_public_users_info(&self, user_ids: &[Uuid]) -> anyhow::Result<Vec<PublicUserInfo>>;
}

/// Live connection state, independent of anything persisted
#[async_trait]
pub trait PresenceRegistry: Send + Sync {
    /// `Some` while the user holds at least one live connection
    async fn is_connected(&self, user_id: Uuid) -> anyhow::Result<Option<ConnectionInfo>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileService: Send + Sync {
    /// Store the file and return its public URL
    async fn upload_file(&self, file: FileUpload) -> anyhow::Result<String>;
}
