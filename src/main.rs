use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blog_suggest::{
    clock::{Clock, SystemClock},
    config::Config,
    db::{
        create_pool, create_redis_client, Cache, ContentStore, MemoryCache, MemoryContentStore,
        PgContentStore, RedisCache,
    },
    routes::{create_router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_suggest=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let store: Arc<dyn ContentStore> = match &config.database_url {
        Some(url) => Arc::new(PgContentStore::new(create_pool(url).await?)),
        None => {
            tracing::warn!("DATABASE_URL not set, using in-process content store");
            Arc::new(MemoryContentStore::new())
        }
    };

    let cache = match &config.redis_url {
        Some(url) => Cache::new(Arc::new(RedisCache::new(create_redis_client(url)?))),
        None => {
            tracing::info!("REDIS_URL not set, using in-process cache");
            let memory = Arc::new(MemoryCache::new(clock.clone()));
            memory.spawn_sweeper(Duration::from_secs(config.cache_ttl_secs.max(1)));
            Cache::new(memory)
        }
    };

    let state = AppState::new(store, cache, clock, &config);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
