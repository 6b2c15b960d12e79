use serde::{Deserialize, Serialize};
use venue_cache::{Fetched, Provenance};
use venue_core::NormalizedResult;
use venue_places::retain_servable;

use crate::keys::CacheKey;

/// What a search hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub results: Vec<NormalizedResult>,
    pub provenance: Provenance,
    /// Whether the low-result retry fired while producing `results`.
    pub retried: bool,
    pub cache_key: Option<String>,
}

impl SearchOutcome {
    /// A legitimate "no results" answer that touched neither cache nor
    /// provider search.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            provenance: Provenance::Live,
            retried: false,
            cache_key: None,
        }
    }

    /// Builds the outcome for an entry fetched through the cache facade.
    ///
    /// Cached entries go through the permanently-closed exclusion again: a
    /// venue may have closed after it was written.
    pub(crate) fn from_fetched(fetched: Fetched<CachedSearch>, key: CacheKey) -> Self {
        let CachedSearch { results, retried } = fetched.value.screened(fetched.provenance);
        Self {
            results,
            provenance: fetched.provenance,
            retried,
            cache_key: Some(key.into_string()),
        }
    }
}

/// Value stored under a search cache key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CachedSearch {
    pub results: Vec<NormalizedResult>,
    #[serde(default)]
    pub retried: bool,
}

impl CachedSearch {
    pub(crate) fn fresh(results: Vec<NormalizedResult>) -> Self {
        Self {
            results,
            retried: false,
        }
    }

    /// Drops permanently closed venues from an entry read back from the
    /// cache; live entries were already screened before normalization.
    pub(crate) fn screened(self, provenance: Provenance) -> Self {
        match provenance {
            Provenance::Cache => Self {
                results: retain_servable(self.results).0,
                retried: self.retried,
            },
            Provenance::Live => self,
        }
    }
}
