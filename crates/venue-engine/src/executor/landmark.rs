use tracing::{debug, info};
use venue_cache::CacheService;
use venue_core::{LandmarkPlan, SearchMethod};

use super::Executor;
use crate::context::RequestContext;
use crate::error::EngineError;
use crate::keys::CacheKey;
use crate::outcome::SearchOutcome;
use crate::request::landmark_request;

impl<S> Executor<S>
where
    S: CacheService + 'static,
{
    /// Two-phase search: resolve the landmark, then run the plan's nearby
    /// or biased-text search around it.
    ///
    /// A landmark that does not geocode is a legitimate empty answer and
    /// the second phase is never issued.
    ///
    /// # Errors
    ///
    /// Propagates geocode and search provider failures and
    /// [`EngineError::Cancelled`].
    pub async fn landmark(
        &self,
        plan: &LandmarkPlan,
        ctx: &RequestContext,
    ) -> Result<SearchOutcome, EngineError> {
        let center = if let Some(center) = plan.resolved_center {
            center
        } else {
            ctx.ensure_active()?;
            let resolved = self
                .geocoder
                .resolve(
                    &plan.landmark_query,
                    &plan.language_code,
                    plan.region_code.as_deref(),
                    ctx,
                )
                .await?;
            let Some(center) = resolved else {
                info!(
                    request_id = %ctx.request_id,
                    landmark = %plan.landmark_query,
                    "landmark did not geocode; skipping search"
                );
                return Ok(SearchOutcome::empty());
            };
            center
        };

        let request = landmark_request(plan, center, self.caps);
        let key = CacheKey::for_search(SearchMethod::Landmark, &request);

        let fetched = self.fetch_cached(&key, request, ctx).await?;
        debug!(
            request_id = %ctx.request_id,
            method = %SearchMethod::Landmark,
            mode = ?plan.after_geocode,
            key = %key,
            provenance = ?fetched.provenance,
            cache_bypassed = ctx.cache_bypassed(),
            "landmark search finished"
        );
        Ok(SearchOutcome::from_fetched(fetched, key))
    }
}
