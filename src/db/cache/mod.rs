use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppResult;

mod macros;
pub mod memory;
pub mod redis;

pub use self::memory::MemoryCache;
pub use self::redis::{create_redis_client, RedisCache};

/// Cache keys; everything derived from a reader's history carries their id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Published post corpus, identical for every reader
    Posts,
    /// Ranked "for you" suggestions
    Suggestions {
        user_id: String,
        current_post_id: Option<String>,
        limit: usize,
    },
    /// Content-similar posts for one post
    RelatedPosts {
        user_id: String,
        post_id: String,
        limit: usize,
    },
}

/// Percent-encodes a caller-supplied key part so `:` can only ever be a separator
fn part(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Posts => write!(f, "posts"),
            CacheKey::Suggestions {
                user_id,
                current_post_id,
                limit,
            } => {
                write!(f, "suggestions:{}:", part(user_id))?;
                match current_post_id {
                    Some(id) => write!(f, "post={}", part(id))?,
                    None => write!(f, "none")?,
                }
                write!(f, ":{}", limit)
            }
            CacheKey::RelatedPosts {
                user_id,
                post_id,
                limit,
            } => write!(f, "related:{}:{}:{}", part(user_id), part(post_id), limit),
        }
    }
}

/// Storage behind the cache: a string-keyed map of serialized values with a TTL
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the stored value, or `None` when absent or expired
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Typed cache facade over a swappable backend
#[derive(Clone)]
pub struct Cache {
    backend: Arc<dyn CacheBackend>,
}

impl Cache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Retrieves and deserializes the value stored under `key`
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let cached = self.backend.get(&key.to_string()).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json)?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Serializes and stores `value` under `key`
    ///
    /// Failures are logged and dropped; a failed write only costs a
    /// recomputation on the next read.
    pub async fn set_in_cache<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        if let Err(e) = self.backend.set(&key.to_string(), json, ttl).await {
            tracing::error!(
                error = %e,
                key = %key,
                backend = self.backend.name(),
                "Failed to write to cache"
            );
        }
    }
}
