use std::sync::Arc;

use anyhow::{Context, Result};
use murmur_chats::{
    ChatListItem, ChatResult, ChatService, FileService, MessageService, PresenceFusion,
    PresenceRegistry, ProfileLookup,
};
use murmur_config::AppConfig;
use murmur_database::{initialize_database, ChatRepository, MessageRepository, UserChatsQuery};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Install the global fmt subscriber; `RUST_LOG` overrides the `info` default.
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .with_target(true)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Externally owned services the chat core depends on
#[derive(Clone)]
pub struct Collaborators {
    pub profiles: Arc<dyn ProfileLookup>,
    pub presence: Arc<dyn PresenceRegistry>,
    pub files: Arc<dyn FileService>,
}

#[derive(Clone)]
pub struct ChatCoreServices {
    pub db_pool: SqlitePool,
    pub chats: Arc<ChatService>,
    pub messages: Arc<MessageService>,
    pub presence: Arc<PresenceFusion>,
}

impl ChatCoreServices {
    pub async fn initialise(config: &AppConfig, collaborators: Collaborators) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise chat database")?;

        let chats_config = config.chats.clone().sanitised();
        let chat_store = Arc::new(ChatRepository::new(db_pool.clone()));
        let message_store = Arc::new(MessageRepository::new(db_pool.clone()));

        let chats = Arc::new(ChatService::new(
            chat_store.clone(),
            message_store.clone(),
            collaborators.profiles,
            collaborators.files,
            chats_config.clone(),
        ));
        let messages = Arc::new(MessageService::new(
            chat_store,
            message_store,
            chats_config.clone(),
        ));
        let presence = Arc::new(PresenceFusion::new(collaborators.presence, &chats_config));

        info!(
            database = %config.database.url,
            enrichment_concurrency = chats_config.enrichment_concurrency,
            failure_policy = ?chats_config.enrichment_failure_policy,
            "chat core ready"
        );

        Ok(Self {
            db_pool,
            chats,
            messages,
            presence,
        })
    }

    /// The full chat-list pipeline: stored chats, enrichment, then live presence
    pub async fn list_chats(&self, user_id: Uuid, query: UserChatsQuery) -> ChatResult<Vec<ChatListItem>> {
        let details = self.chats.get_user_chats(user_id, query).await?;
        self.presence.fuse(user_id, details).await
    }

    pub async fn shutdown(self) {
        self.db_pool.close().await;
        info!("chat core stopped");
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
