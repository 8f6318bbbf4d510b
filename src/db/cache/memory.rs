use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::{sync::Mutex, task::JoinHandle};

use super::CacheBackend;
use crate::{clock::Clock, error::AppResult};

struct CacheEntry {
    value: String,
    inserted_at: DateTime<Utc>,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => now - self.inserted_at < ttl,
            // TTL too large to represent; treat as never expiring
            Err(_) => true,
        }
    }
}

/// Process-local cache backend
///
/// A read drops the entry it finds past its TTL. Entries that are never read
/// again are reclaimed by [`MemoryCache::purge_expired`], which
/// [`MemoryCache::spawn_sweeper`] runs on an interval.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Drops every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        before - entries.len()
    }

    /// Purges expired entries every `every` until the cache is dropped
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let Some(live) = cache.upgrade() else {
                    break;
                };
                let removed = live.purge_expired().await;
                if removed > 0 {
                    tracing::debug!(removed, "Swept expired cache entries");
                }
            }
        })
    }

    #[cfg(test)]
    async fn stored(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[async_trait::async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some(entry) if entry.is_fresh(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> AppResult<()> {
        let entry = CacheEntry {
            value,
            inserted_at: self.clock.now(),
            ttl,
        };
        self.entries.lock().await.insert(key.to_string(), entry);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    fn cache_with_clock() -> (MemoryCache, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap());
        (MemoryCache::new(Arc::new(clock.clone())), clock)
    }

    #[tokio::test]
    async fn test_miss_on_empty_cache() {
        let (cache, _clock) = cache_with_clock();
        assert_eq!(cache.get("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let (cache, clock) = cache_with_clock();
        cache
            .set("k", "v".to_string(), Duration::from_secs(300))
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(299));
        assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_expires_at_ttl_and_is_evicted_on_read() {
        let (cache, clock) = cache_with_clock();
        cache
            .set("k", "v".to_string(), Duration::from_secs(300))
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(300));
        assert_eq!(cache.stored().await, 1);
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert_eq!(cache.stored().await, 0);
    }

    #[tokio::test]
    async fn test_purge_reclaims_entries_that_are_never_read_again() {
        let (cache, clock) = cache_with_clock();
        for reader in ["alice", "bob"] {
            cache
                .set(reader, "v".to_string(), Duration::from_secs(300))
                .await
                .unwrap();
        }
        clock.advance(chrono::Duration::seconds(200));
        cache
            .set("carol", "v".to_string(), Duration::from_secs(300))
            .await
            .unwrap();

        clock.advance(chrono::Duration::seconds(100));
        assert_eq!(cache.purge_expired().await, 2);
        assert_eq!(cache.purge_expired().await, 0);
        assert_eq!(cache.stored().await, 1);
        assert_eq!(cache.get("carol").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_sweeper_reclaims_expired_entries() {
        let (cache, clock) = cache_with_clock();
        let cache = Arc::new(cache);
        for i in 0..10 {
            cache
                .set(&format!("reader-{}", i), "v".to_string(), Duration::from_secs(300))
                .await
                .unwrap();
        }
        clock.advance(chrono::Duration::minutes(5));

        let sweeper = cache.spawn_sweeper(Duration::from_millis(10));
        for _ in 0..50 {
            if cache.stored().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(cache.stored().await, 0);

        drop(cache);
        tokio::time::timeout(Duration::from_secs(1), sweeper)
            .await
            .expect("sweeper stops once the cache is dropped")
            .unwrap();
    }

    #[tokio::test]
    async fn test_overwrite_resets_insertion_time() {
        let (cache, clock) = cache_with_clock();
        cache
            .set("k", "old".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        clock.advance(chrono::Duration::seconds(50));
        cache
            .set("k", "new".to_string(), Duration::from_secs(60))
            .await
            .unwrap();
        clock.advance(chrono::Duration::seconds(50));

        assert_eq!(cache.get("k").await.unwrap(), Some("new".to_string()));
    }
}
