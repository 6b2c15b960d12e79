use std::future::Future;
use std::time::Duration;

use crate::errors::CacheResult;

/// Operations every cache store backend supports.
///
/// Values are opaque strings; the facade owns (de)serialization. The store
/// is treated as overwrite-with-TTL per key: no read-modify-write.
pub trait CacheService: Send + Sync {
    /// Returns `Ok(Some(value))` on hit, `Ok(None)` on miss.
    fn get(&self, key: &str) -> impl Future<Output = CacheResult<Option<String>>> + Send;

    fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl Future<Output = CacheResult<()>> + Send;

    fn delete(&self, key: &str) -> impl Future<Output = CacheResult<()>> + Send;

    fn health_check(&self) -> impl Future<Output = CacheResult<bool>> + Send;

    fn provider_name(&self) -> &'static str;

    /// `false` for the no-op backend; the facade then calls producers
    /// directly instead of racing them.
    fn is_enabled(&self) -> bool {
        true
    }
}
