use tracing::debug;
use venue_cache::CacheService;
use venue_core::{NearbyQuery, SearchMethod};

use super::Executor;
use crate::context::RequestContext;
use crate::error::EngineError;
use crate::keys::CacheKey;
use crate::outcome::SearchOutcome;
use crate::request::nearby_request;

impl<S> Executor<S>
where
    S: CacheService + 'static,
{
    /// Coordinate-anchored search restricted to the query's circle, with
    /// place types taken from the cuisine registry.
    ///
    /// # Errors
    ///
    /// Propagates provider failures and [`EngineError::Cancelled`].
    pub async fn nearby(
        &self,
        query: &NearbyQuery,
        ctx: &RequestContext,
    ) -> Result<SearchOutcome, EngineError> {
        let request = nearby_request(query, self.caps);
        let key = CacheKey::for_search(SearchMethod::Nearby, &request);

        let fetched = self.fetch_cached(&key, request, ctx).await?;
        debug!(
            request_id = %ctx.request_id,
            method = %SearchMethod::Nearby,
            key = %key,
            provenance = ?fetched.provenance,
            cache_bypassed = ctx.cache_bypassed(),
            "nearby search finished"
        );
        Ok(SearchOutcome::from_fetched(fetched, key))
    }
}
