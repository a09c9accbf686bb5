use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "murmur.toml",
    "config/murmur.toml",
    "crates/config/murmur.toml",
    "../murmur.toml",
    "../config/murmur.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub chats: ChatsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://murmur.db".to_string(),
            max_connections: 10,
        }
    }
}

/// What the chat list does when enriching a single chat fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentFailurePolicy {
    /// Abort the whole list on the first error.
    #[default]
    FailFast,
    /// Drop the failing chat and return the rest.
    SkipFailed,
}

/// Limits and tuning for the chat and message services.
///
/// ```
/// use murmur_config::{ChatsConfig, EnrichmentFailurePolicy};
///
/// let chats = ChatsConfig::default();
/// assert_eq!(chats.enrichment_concurrency, 8);
/// assert_eq!(chats.enrichment_failure_policy, EnrichmentFailurePolicy::FailFast);
/// assert_eq!(chats.default_page_size, 50);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatsConfig {
    pub enrichment_concurrency: usize,
    pub enrichment_failure_policy: EnrichmentFailurePolicy,
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub max_message_length: usize,
    pub max_attachments: usize,
    pub max_group_name_length: usize,
}

impl Default for ChatsConfig {
    fn default() -> Self {
        Self {
            enrichment_concurrency: 8,
            enrichment_failure_policy: EnrichmentFailurePolicy::FailFast,
            default_page_size: 50,
            max_page_size: 100,
            max_message_length: 4096,
            max_attachments: 10,
            max_group_name_length: 128,
        }
    }
}

impl ChatsConfig {
    /// Clamp values that would otherwise stall or invert paging.
    pub fn sanitised(mut self) -> Self {
        self.enrichment_concurrency = self.enrichment_concurrency.max(1);
        self.default_page_size = self.default_page_size.max(1);
        self.max_page_size = self.max_page_size.max(self.default_page_size);
        self
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use murmur_config::load;
///
/// std::env::remove_var("MURMUR_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.database.url.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?;

    let environment_overrides = config::Environment::with_prefix("MURMUR").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("MURMUR_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via MURMUR_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    config.chats = config.chats.sanitised();

    debug!(?config, "loaded chat core configuration");
    Ok(config)
}
