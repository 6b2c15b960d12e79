//! Per-search request context.

use tokio::sync::watch;
use uuid::Uuid;
use venue_cache::StoreLatch;

use crate::error::EngineError;

/// Identity and cooperative cancellation signal for one inbound search.
///
/// Cancellation is checked between phases only; a provider call already in
/// flight is allowed to finish so the cache still gets populated.
///
/// Clones share one [`StoreLatch`]: after the cache store fails once, every
/// later cache lookup of the same search goes straight to the provider.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    cancel: Option<watch::Receiver<bool>>,
    store_latch: StoreLatch,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            cancel: None,
            store_latch: StoreLatch::new(),
        }
    }

    /// Context that reports cancelled once `true` is sent on the channel.
    #[must_use]
    pub fn with_cancel(cancel: watch::Receiver<bool>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            cancel: Some(cancel),
            store_latch: StoreLatch::new(),
        }
    }

    /// `true` once a cache read has failed during this search.
    #[must_use]
    pub fn cache_bypassed(&self) -> bool {
        self.store_latch.is_tripped()
    }

    pub(crate) fn store_latch(&self) -> &StoreLatch {
        &self.store_latch
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] once the caller has signalled
    /// cancellation.
    pub fn ensure_active(&self) -> Result<(), EngineError> {
        if self.is_cancelled() {
            tracing::debug!(request_id = %self.request_id, "search cancelled between phases");
            return Err(EngineError::Cancelled);
        }
        Ok(())
    }
}
