/// A macro to simplify read-through caching.
///
/// Returns the cached value when present. Otherwise awaits `$block`, stores
/// its successful result under `$key` for `$ttl`, and returns it. Errors from
/// `$block` propagate and are never cached. A failed cache read is logged and
/// treated as a miss.
///
/// # Arguments
/// * `$cache`: A [`Cache`](crate::db::Cache).
/// * `$key`: The [`CacheKey`](crate::db::CacheKey) to read and write.
/// * `$ttl`: A `std::time::Duration` the stored value stays valid for.
/// * `$block`: A future yielding `AppResult<T>`, run only on a miss.
///
/// # Example
/// ```rust,ignore
/// pub async fn posts(&self) -> AppResult<Vec<Post>> {
///     cached!(self.cache, key, ttl, async move {
///         self.store.published_posts().await
///     })
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache.get_from_cache(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache read failed, recomputing");
                None
            }
        };

        match hit {
            Some(cached) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            None => {
                tracing::debug!(key = %key, "Cache miss");
                let value = $block.await?;
                $cache.set_in_cache(&key, &value, $ttl).await;
                Ok(value)
            }
        }
    }};
}
