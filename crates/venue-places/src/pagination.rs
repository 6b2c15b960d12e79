//! Bounded multi-page aggregation with id-based de-duplication.
//!
//! The provider hands back an opaque `nextPageToken` with each text-search
//! page. [`aggregate`] follows it while all three hold:
//!
//! - a continuation token exists,
//! - fewer than `result_cap` unique results have been collected,
//! - fewer than `page_cap` pages have been fetched.
//!
//! Each page is screened by business status and normalized before merging,
//! and a result is merged only if its id has not been seen. A token sequence
//! that never ends (or that keeps repeating the same records) is cut off by
//! the page cap.

use std::collections::HashSet;
use std::future::Future;

use venue_core::NormalizedResult;

use crate::normalize::normalize_place;
use crate::status_filter::{screen_raw, StatusCounts};
use crate::types::SearchPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCaps {
    pub result_cap: usize,
    pub page_cap: usize,
}

/// Running state of one aggregation.
#[derive(Debug)]
pub struct PaginationState {
    pub continuation_token: Option<String>,
    pub accumulated: Vec<NormalizedResult>,
    seen_ids: HashSet<String>,
    pub pages_fetched: usize,
    pub page_cap: usize,
    pub result_cap: usize,
    pub status_counts: StatusCounts,
}

impl PaginationState {
    #[must_use]
    pub fn new(caps: PageCaps) -> Self {
        Self {
            continuation_token: None,
            accumulated: Vec::new(),
            seen_ids: HashSet::new(),
            pages_fetched: 0,
            page_cap: caps.page_cap,
            result_cap: caps.result_cap,
            status_counts: StatusCounts::default(),
        }
    }

    /// Screens, normalizes and merges one page. Returns how many new results
    /// were added.
    pub fn absorb(&mut self, page: SearchPage) -> usize {
        self.pages_fetched += 1;
        self.continuation_token = page.continuation().map(str::to_owned);

        let screened = screen_raw(page.places);
        self.status_counts.add(screened.counts);

        let before = self.accumulated.len();
        for raw in &screened.records {
            if self.accumulated.len() >= self.result_cap {
                break;
            }
            let result = normalize_place(raw);
            if result.id.is_empty() {
                tracing::debug!("skipping provider record without a place id");
                continue;
            }
            if self.seen_ids.insert(result.id.clone()) {
                self.accumulated.push(result);
            }
        }
        self.accumulated.len() - before
    }

    /// `true` while another page may be requested.
    #[must_use]
    pub fn should_continue(&self) -> bool {
        self.continuation_token.is_some()
            && self.accumulated.len() < self.result_cap
            && self.pages_fetched < self.page_cap
    }

    #[must_use]
    pub fn finish(self) -> Aggregated {
        Aggregated {
            results: self.accumulated,
            pages_fetched: self.pages_fetched,
            status_counts: self.status_counts,
        }
    }
}

/// Output of a completed aggregation.
#[derive(Debug, Clone, Default)]
pub struct Aggregated {
    pub results: Vec<NormalizedResult>,
    pub pages_fetched: usize,
    pub status_counts: StatusCounts,
}

/// Drives `fetch_page` until one of the termination conditions is met.
///
/// `fetch_page` receives `None` for the first page and the previous page's
/// continuation token afterwards. Any error aborts the aggregation and is
/// returned as-is; partial results are discarded.
///
/// # Errors
///
/// Propagates the first error returned by `fetch_page`.
pub async fn aggregate<F, Fut, E>(caps: PageCaps, mut fetch_page: F) -> Result<Aggregated, E>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<SearchPage, E>>,
{
    let mut state = PaginationState::new(caps);
    if caps.page_cap == 0 || caps.result_cap == 0 {
        return Ok(state.finish());
    }

    let first = fetch_page(None).await?;
    state.absorb(first);

    while state.should_continue() {
        let token = state.continuation_token.take();
        let page = fetch_page(token).await?;
        let added = state.absorb(page);
        tracing::debug!(
            page = state.pages_fetched,
            added,
            total = state.accumulated.len(),
            "merged result page"
        );
    }

    let counts = state.status_counts;
    tracing::info!(
        pages = state.pages_fetched,
        results = state.accumulated.len(),
        dropped_perm_closed = counts.dropped_perm_closed,
        flagged_temp_closed = counts.flagged_temp_closed,
        missing_status = counts.missing_status,
        "aggregated search results"
    );

    Ok(state.finish())
}
