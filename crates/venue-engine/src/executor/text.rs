use tracing::{debug, info};
use venue_cache::CacheService;
use venue_core::{SearchMethod, TextQuery};
use venue_places::SearchRequest;

use super::Executor;
use crate::context::RequestContext;
use crate::error::EngineError;
use crate::keys::CacheKey;
use crate::outcome::{CachedSearch, SearchOutcome};
use crate::request::text_request;
use crate::retry::{self, RetryDecision};

impl<S> Executor<S>
where
    S: CacheService + 'static,
{
    /// Free-text search, with one bias-free retry when a biased first
    /// attempt finds at most one venue.
    ///
    /// The final list (after any retry) is cached under the key of the
    /// original request; the relaxed attempt is cached under its own key.
    ///
    /// # Errors
    ///
    /// Propagates provider failures from either attempt and
    /// [`EngineError::Cancelled`].
    pub async fn text(
        &self,
        query: &TextQuery,
        ctx: &RequestContext,
    ) -> Result<SearchOutcome, EngineError> {
        ctx.ensure_active()?;

        let request = text_request(query, self.caps);
        let key = CacheKey::for_search(SearchMethod::Text, &request);

        let this = self.clone();
        let query = query.clone();
        let producer_ctx = ctx.clone();
        let fetched = self
            .facade
            .get_or_compute_latched(ctx.store_latch(), key.as_str(), key.ttl(), move || {
                let this = this.clone();
                let query = query.clone();
                let request = request.clone();
                let ctx = producer_ctx.clone();
                async move { this.text_attempts(&query, &request, &ctx).await }
            })
            .await?;

        debug!(
            request_id = %ctx.request_id,
            method = %SearchMethod::Text,
            key = %key,
            provenance = ?fetched.provenance,
            retried = fetched.value.retried,
            cache_bypassed = ctx.cache_bypassed(),
            "text search finished"
        );
        Ok(SearchOutcome::from_fetched(fetched, key))
    }

    async fn text_attempts(
        &self,
        query: &TextQuery,
        request: &SearchRequest,
        ctx: &RequestContext,
    ) -> Result<CachedSearch, EngineError> {
        let first = self.client.fetch_all(request, self.caps).await?.results;

        let RetryDecision::Retry(relaxed) = retry::decide(query, first.len()) else {
            return Ok(CachedSearch::fresh(first));
        };

        let relaxed_request = text_request(&relaxed, self.caps);
        let relaxed_key = CacheKey::for_search(SearchMethod::Text, &relaxed_request);
        let second = self.fetch_cached(&relaxed_key, relaxed_request, ctx).await?;
        let second = second.value.screened(second.provenance).results;

        info!(
            request_id = %ctx.request_id,
            first_count = first.len(),
            retry_count = second.len(),
            relaxed_key = %relaxed_key,
            "low-result text search retried without bias"
        );

        Ok(CachedSearch {
            results: retry::keep_better(first, second),
            retried: true,
        })
    }
}
