//! Pre-flight cache probe that can answer a search without running its
//! executor.

use tracing::debug;
use venue_cache::{CacheFacade, CacheService, Lookup};

use crate::keys::CacheKey;
use crate::outcome::CachedSearch;

/// What the pre-flight read found.
#[derive(Debug)]
pub(crate) enum Probe {
    Hit(CachedSearch),
    Miss,
    /// The store failed or timed out; the rest of the search should not
    /// wait on it again.
    StoreUnavailable,
}

/// Reads `key` without ever calling the provider.
pub(crate) async fn probe<S>(facade: &CacheFacade<S>, key: &CacheKey) -> Probe
where
    S: CacheService + 'static,
{
    match facade.lookup::<CachedSearch>(key.as_str()).await {
        Lookup::Hit(hit) => {
            debug!(key = %key, "cache guard hit; skipping executor");
            Probe::Hit(hit)
        }
        Lookup::Miss => Probe::Miss,
        Lookup::Unavailable(e) => {
            debug!(key = %key, error = %e, "cache guard probe failed; bypassing cache");
            Probe::StoreUnavailable
        }
    }
}
