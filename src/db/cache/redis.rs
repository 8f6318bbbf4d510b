use std::time::Duration;

use ::redis::{AsyncCommands, Client};

use super::CacheBackend;
use crate::error::AppResult;

/// Creates a Redis client for caching
///
/// Connections are multiplexed per operation via the connection-manager feature.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Redis-backed cache; expiry is delegated to Redis via `SET EX`
#[derive(Clone)]
pub struct RedisCache {
    redis_client: Client,
}

impl RedisCache {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }
}

fn ttl_seconds(ttl: Duration) -> u64 {
    // SET EX rejects 0
    ttl.as_secs().max(1)
}

#[async_trait::async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key).await?;
        Ok(cached)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key, value, ttl_seconds(ttl)).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
