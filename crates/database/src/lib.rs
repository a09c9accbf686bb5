//! Murmur Database Crate
//!
//! Persistence for the chat core: connection management, migrations, the
//! [`ChatStore`] and [`MessageStore`] seams and their SQLite repositories.

use murmur_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod stores;
pub mod types;

pub use connection::{prepare_database, DatabaseConnection};
pub use migrations::run_migrations;

pub use repos::{ChatRepository, MessageRepository};
pub use stores::{ChatStore, MessageStore};

pub use entities::{
    Attachment, Chat, ChatType, Message, NewAttachment, NewChat, NewMessage, Participant,
    UserChatsQuery,
};

pub use types::{DatabaseError, DatabaseResult, StoreError, StoreResult};

/// Connect to the configured database and apply migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("{e:#}")))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(format!("{e:#}")))?;

    Ok(pool)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    /// A migrated pool backed by a file in a fresh temp dir. Keep the
    /// `TempDir` alive for as long as the pool is used.
    pub async fn create_test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 4,
        };

        let pool = initialize_database(&config).await.unwrap();
        (pool, temp_dir)
    }
}
