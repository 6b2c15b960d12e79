//! Enum dispatch over the configured store backend.

use std::time::Duration;

use tracing::{info, warn};
use venue_core::{redact_url, AppConfig, CacheBackend};

use crate::errors::CacheResult;
use crate::providers::{MemoryCacheService, NoOpCacheService, RedisCacheService};
use crate::traits::CacheService;

/// Upper bound on in-process entries when the memory backend is selected.
const MEMORY_MAX_CAPACITY: u64 = 10_000;

/// Store chosen from configuration.
///
/// Construction never fails: a Redis backend that cannot be reached at
/// startup degrades to [`CacheProvider::NoOp`] so searches keep working
/// without a cache.
#[derive(Debug, Clone)]
pub enum CacheProvider {
    Redis(Box<RedisCacheService>),
    Memory(Box<MemoryCacheService>),
    NoOp(NoOpCacheService),
}

impl CacheProvider {
    /// Builds the backend named by `config.cache_backend`.
    ///
    /// The Redis connect attempt is bounded by `config.cache_timeout_ms`.
    pub async fn from_config(config: &AppConfig) -> Self {
        match config.cache_backend {
            CacheBackend::Disabled => {
                info!("cache disabled; searches will always call the provider");
                Self::NoOp(NoOpCacheService::new())
            }
            CacheBackend::Memory => {
                info!(max_capacity = MEMORY_MAX_CAPACITY, "using in-memory cache");
                Self::Memory(Box::new(MemoryCacheService::new(MEMORY_MAX_CAPACITY)))
            }
            CacheBackend::Redis => {
                let timeout = Duration::from_millis(config.cache_timeout_ms);
                match tokio::time::timeout(timeout, RedisCacheService::connect(&config.redis_url))
                    .await
                {
                    Ok(Ok(service)) => {
                        info!(url = %redact_url(&config.redis_url), "using redis cache");
                        Self::Redis(Box::new(service))
                    }
                    Ok(Err(e)) => {
                        warn!(
                            url = %redact_url(&config.redis_url),
                            error = %e,
                            "redis unavailable; continuing without cache"
                        );
                        Self::NoOp(NoOpCacheService::new())
                    }
                    Err(_) => {
                        warn!(
                            url = %redact_url(&config.redis_url),
                            timeout_ms = config.cache_timeout_ms,
                            "redis connect timed out; continuing without cache"
                        );
                        Self::NoOp(NoOpCacheService::new())
                    }
                }
            }
        }
    }

    /// Convenience constructor for a disabled cache.
    #[must_use]
    pub fn disabled() -> Self {
        Self::NoOp(NoOpCacheService::new())
    }
}

impl CacheService for CacheProvider {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self {
            Self::Redis(s) => s.get(key).await,
            Self::Memory(s) => s.get(key).await,
            Self::NoOp(s) => s.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        match self {
            Self::Redis(s) => s.set(key, value, ttl).await,
            Self::Memory(s) => s.set(key, value, ttl).await,
            Self::NoOp(s) => s.set(key, value, ttl).await,
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        match self {
            Self::Redis(s) => s.delete(key).await,
            Self::Memory(s) => s.delete(key).await,
            Self::NoOp(s) => s.delete(key).await,
        }
    }

    async fn health_check(&self) -> CacheResult<bool> {
        match self {
            Self::Redis(s) => s.health_check().await,
            Self::Memory(s) => s.health_check().await,
            Self::NoOp(s) => s.health_check().await,
        }
    }

    fn provider_name(&self) -> &'static str {
        match self {
            Self::Redis(s) => s.provider_name(),
            Self::Memory(s) => s.provider_name(),
            Self::NoOp(s) => s.provider_name(),
        }
    }

    fn is_enabled(&self) -> bool {
        !matches!(self, Self::NoOp(_))
    }
}
