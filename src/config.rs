use std::time::Duration;

use serde::Deserialize;

use crate::services::{EngineSettings, DEFAULT_RELATED_LIMIT, DEFAULT_SUGGESTION_LIMIT};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; the in-process store is used when unset
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL; the in-process cache is used when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// How long suggestion and corpus results stay cached
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Number of most recent reading observations used to build preferences
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    #[serde(default = "default_related_limit")]
    pub related_limit: usize,

    /// Largest `limit` accepted from HTTP callers
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_history_limit() -> usize {
    50
}

fn default_suggestion_limit() -> usize {
    DEFAULT_SUGGESTION_LIMIT
}

fn default_related_limit() -> usize {
    DEFAULT_RELATED_LIMIT
}

fn default_max_limit() -> usize {
    24
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            redis_url: None,
            host: default_host(),
            port: default_port(),
            cache_ttl_secs: default_cache_ttl_secs(),
            history_limit: default_history_limit(),
            suggestion_limit: default_suggestion_limit(),
            related_limit: default_related_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Engine tuning derived from this configuration
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            history_limit: self.history_limit,
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
