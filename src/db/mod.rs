pub mod cache;
pub mod memory;
pub mod postgres;
pub mod store;

pub use cache::{create_redis_client, Cache, CacheBackend, CacheKey, MemoryCache, RedisCache};
pub use memory::MemoryContentStore;
pub use postgres::{create_pool, PgContentStore};
pub use store::ContentStore;
