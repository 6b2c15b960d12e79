//! Provider method executors: one per [`venue_core::CanonicalQuery`] variant.
//!
//! Each executor builds its provider request, resolves any missing anchor,
//! and runs the paginated fetch behind the cache facade. Provider failures
//! always propagate; an empty list only ever means "no venues".

mod landmark;
mod nearby;
mod text;

use tracing::debug;
use venue_cache::{CacheFacade, CacheService, Fetched};
use venue_places::{PageCaps, PlacesClient, SearchRequest};

use crate::context::RequestContext;
use crate::error::EngineError;
use crate::geocode::Geocoder;
use crate::keys::CacheKey;
use crate::outcome::CachedSearch;

pub struct Executor<S> {
    client: PlacesClient,
    facade: CacheFacade<S>,
    geocoder: Geocoder<S>,
    caps: PageCaps,
}

impl<S> Clone for Executor<S> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            facade: self.facade.clone(),
            geocoder: self.geocoder.clone(),
            caps: self.caps,
        }
    }
}

impl<S> std::fmt::Debug for Executor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("client", &self.client)
            .field("caps", &self.caps)
            .finish_non_exhaustive()
    }
}

impl<S> Executor<S>
where
    S: CacheService + 'static,
{
    #[must_use]
    pub fn new(
        client: PlacesClient,
        facade: CacheFacade<S>,
        geocoder: Geocoder<S>,
        caps: PageCaps,
    ) -> Self {
        Self {
            client,
            facade,
            geocoder,
            caps,
        }
    }

    /// Runs `request` through the paginated fetch, cached under `key`.
    async fn fetch_cached(
        &self,
        key: &CacheKey,
        request: SearchRequest,
        ctx: &RequestContext,
    ) -> Result<Fetched<CachedSearch>, EngineError> {
        ctx.ensure_active()?;

        let client = self.client.clone();
        let caps = self.caps;
        let log_key = key.to_string();

        self.facade
            .get_or_compute_latched(ctx.store_latch(), key.as_str(), key.ttl(), move || {
                let client = client.clone();
                let request = request.clone();
                let key = log_key.clone();
                async move {
                    let aggregated = client.fetch_all(&request, caps).await?;
                    debug!(
                        key = %key,
                        endpoint = request.endpoint(),
                        pages = aggregated.pages_fetched,
                        results = aggregated.results.len(),
                        "provider search complete"
                    );
                    Ok(CachedSearch::fresh(aggregated.results))
                }
            })
            .await
    }
}
