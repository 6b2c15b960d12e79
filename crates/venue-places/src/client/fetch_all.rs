//! Multi-page search loop for `PlacesClient`.

use crate::error::PlacesError;
use crate::pagination::{aggregate, Aggregated, PageCaps};
use crate::types::SearchRequest;

use super::PlacesClient;

impl PlacesClient {
    /// Fetches up to `caps.page_cap` pages of `request`, screening,
    /// normalizing and de-duplicating as it goes.
    ///
    /// **All-or-nothing semantics**: a failure on any page discards earlier
    /// pages and returns the error, so a partial list is never mistaken for
    /// a complete answer.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::search_page`].
    pub async fn fetch_all(
        &self,
        request: &SearchRequest,
        caps: PageCaps,
    ) -> Result<Aggregated, PlacesError> {
        aggregate(caps, |token| async move {
            self.search_page(request, token.as_deref()).await
        })
        .await
    }
}
