//! Routes a canonical query to its executor.

use std::time::Duration;

use tracing::{debug, warn};
use venue_cache::{CacheFacade, CacheProvider, CacheService, Fetched, Provenance};
use venue_core::{AppConfig, CanonicalQuery};
use venue_places::{PageCaps, PlacesClient, PlacesError};

use crate::context::RequestContext;
use crate::error::EngineError;
use crate::executor::Executor;
use crate::geocode::Geocoder;
use crate::guard::{self, Probe};
use crate::keys::CacheKey;
use crate::outcome::SearchOutcome;
use crate::request::planned_request;

/// Entry point for venue searches.
///
/// Without a provider credential the engine still constructs, and every
/// search returns an empty list without attempting a provider call.
pub struct Engine<S = CacheProvider> {
    executor: Option<Executor<S>>,
    facade: CacheFacade<S>,
    caps: PageCaps,
}

impl<S> Clone for Engine<S> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            facade: self.facade.clone(),
            caps: self.caps,
        }
    }
}

impl<S> std::fmt::Debug for Engine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("configured", &self.executor.is_some())
            .field("caps", &self.caps)
            .finish_non_exhaustive()
    }
}

impl<S> Engine<S>
where
    S: CacheService + 'static,
{
    /// Builds an engine over `store` using the endpoints, timeouts and caps
    /// in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Provider`] if a configured base URL is invalid
    /// or the HTTP client cannot be built. A missing credential is not an
    /// error.
    pub fn new(config: &AppConfig, store: S) -> Result<Self, EngineError> {
        let facade = CacheFacade::new(store, Duration::from_millis(config.cache_timeout_ms));
        let caps = PageCaps {
            result_cap: config.max_results,
            page_cap: config.max_pages,
        };

        let client = match config.places_api_key.as_deref() {
            Some(api_key) => match PlacesClient::with_base_urls(
                api_key,
                config.http_timeout_ms,
                &config.places_base_url,
                &config.geocode_base_url,
            ) {
                Ok(client) => Some(client),
                Err(PlacesError::MissingCredential) => None,
                Err(e) => return Err(e.into()),
            },
            None => None,
        };

        if client.is_none() {
            warn!("no place-search credential configured; searches will return no results");
        }

        let executor = client.map(|client| {
            let geocoder = Geocoder::new(
                client.clone(),
                facade.clone(),
                config.geocode_memo_capacity,
                Duration::from_secs(config.geocode_memo_ttl_secs),
            );
            Executor::new(client, facade.clone(), geocoder, caps)
        });

        Ok(Self {
            executor,
            facade,
            caps,
        })
    }

    /// The cache store searches go through.
    #[must_use]
    pub fn cache(&self) -> &S {
        self.facade.store()
    }

    /// Runs one search.
    ///
    /// The cache guard is consulted first with the key the executor would
    /// use; a hit answers without touching the executor. If the guard finds
    /// the store unavailable, the rest of the search bypasses the cache so a
    /// dead store costs at most one cache timeout.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Provider`] when the provider rejects or fails a call.
    /// - [`EngineError::Cancelled`] when `ctx` is cancelled between phases.
    pub async fn search(
        &self,
        query: &CanonicalQuery,
        ctx: &RequestContext,
    ) -> Result<SearchOutcome, EngineError> {
        let Some(executor) = &self.executor else {
            debug!(request_id = %ctx.request_id, "search skipped: provider not configured");
            return Ok(SearchOutcome::empty());
        };

        ctx.ensure_active()?;
        if let Some((method, request)) = planned_request(query, self.caps) {
            let key = CacheKey::for_search(method, &request);
            match guard::probe(&self.facade, &key).await {
                Probe::Hit(value) => {
                    let hit = Fetched {
                        value,
                        provenance: Provenance::Cache,
                    };
                    return Ok(SearchOutcome::from_fetched(hit, key));
                }
                Probe::Miss => {}
                Probe::StoreUnavailable => ctx.store_latch().trip(),
            }
        }

        debug!(request_id = %ctx.request_id, method = %query.method(), "dispatching to executor");
        match query {
            CanonicalQuery::Text(q) => executor.text(q, ctx).await,
            CanonicalQuery::Nearby(q) => executor.nearby(q, ctx).await,
            CanonicalQuery::Landmark(plan) => executor.landmark(plan, ctx).await,
        }
    }
}
