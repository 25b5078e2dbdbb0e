pub mod cache;
pub mod postgres;

mod macros;

pub use self::cache::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
pub use self::postgres::{create_pool, run_migrations};
