//! Landmark/city name resolution.
//!
//! Lookups go through a bounded in-process memo, then the shared cache
//! (long TTL), then the geocode endpoint. Misses are remembered as well as
//! hits so an unknown landmark is not re-geocoded on every search.

use std::time::Duration;

use moka::future::Cache;
use tracing::debug;
use venue_cache::{CacheFacade, CacheService};
use venue_core::LatLng;
use venue_places::PlacesClient;

use crate::context::RequestContext;
use crate::error::EngineError;
use crate::keys::CacheKey;

pub struct Geocoder<S> {
    client: PlacesClient,
    facade: CacheFacade<S>,
    memo: Cache<String, Option<LatLng>>,
}

impl<S> Clone for Geocoder<S> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            facade: self.facade.clone(),
            memo: self.memo.clone(),
        }
    }
}

impl<S> std::fmt::Debug for Geocoder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geocoder")
            .field("memo_entries", &self.memo.entry_count())
            .finish_non_exhaustive()
    }
}

impl<S> Geocoder<S>
where
    S: CacheService + 'static,
{
    #[must_use]
    pub fn new(
        client: PlacesClient,
        facade: CacheFacade<S>,
        memo_capacity: u64,
        memo_ttl: Duration,
    ) -> Self {
        let memo = Cache::builder()
            .max_capacity(memo_capacity)
            .time_to_live(memo_ttl)
            .build();
        Self {
            client,
            facade,
            memo,
        }
    }

    /// Resolves `address` to coordinates. `Ok(None)` is a geocode miss and
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Provider`] if the geocode endpoint fails or
    /// rejects the request.
    pub async fn resolve(
        &self,
        address: &str,
        language_code: &str,
        region_code: Option<&str>,
        ctx: &RequestContext,
    ) -> Result<Option<LatLng>, EngineError> {
        let key = CacheKey::for_geocode(address, language_code, region_code);

        if let Some(memoized) = self.memo.get(key.as_str()).await {
            debug!(key = %key, found = memoized.is_some(), "geocode memo hit");
            return Ok(memoized);
        }

        let client = self.client.clone();
        let address_owned = address.to_owned();
        let language = language_code.to_owned();
        let region = region_code.map(str::to_owned);

        let fetched = self
            .facade
            .get_or_compute_latched(ctx.store_latch(), key.as_str(), key.ttl(), move || {
                let client = client.clone();
                let address = address_owned.clone();
                let language = language.clone();
                let region = region.clone();
                async move {
                    client
                        .geocode(&address, &language, region.as_deref())
                        .await
                        .map_err(EngineError::from)
                }
            })
            .await?;

        debug!(
            key = %key,
            found = fetched.value.is_some(),
            provenance = ?fetched.provenance,
            "geocode resolved"
        );
        self.memo.insert(key.into_string(), fetched.value).await;
        Ok(fetched.value)
    }
}
