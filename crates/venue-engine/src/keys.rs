//! Cache keys and TTLs.
//!
//! A search key is derived from the exact first-page body sent to the
//! provider, so any change to query text, bias, types, region or language
//! yields a different key and a relaxed retry never collides with its
//! original attempt.

use std::fmt;
use std::time::Duration;

use sha2::{Digest, Sha256};
use venue_core::SearchMethod;
use venue_places::SearchRequest;

const KEY_PREFIX: &str = "venue:v1";

const HOUR: u64 = 3_600;
pub const TEXT_TTL: Duration = Duration::from_secs(6 * HOUR);
pub const NEARBY_TTL: Duration = Duration::from_secs(3 * HOUR);
pub const LANDMARK_TTL: Duration = Duration::from_secs(6 * HOUR);
pub const GEOCODE_TTL: Duration = Duration::from_secs(7 * 24 * HOUR);

/// A cache key together with the TTL its entries are written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    key: String,
    ttl: Duration,
}

impl CacheKey {
    /// Key for the search `request` issued on behalf of `method`.
    ///
    /// Landmark second-phase requests are keyed under `landmark` so they
    /// carry the landmark TTL even when they reuse a nearby or text body.
    #[must_use]
    pub fn for_search(method: SearchMethod, request: &SearchRequest) -> Self {
        let body = request.to_body(None).to_string();
        Self {
            key: format!("{KEY_PREFIX}:{method}:{}", sha256_hex(&body)),
            ttl: search_ttl(method),
        }
    }

    /// Key for geocoding `address` in a given language/region.
    #[must_use]
    pub fn for_geocode(address: &str, language_code: &str, region_code: Option<&str>) -> Self {
        let material = format!(
            "{}|{}|{}",
            language_code.to_lowercase(),
            region_code.unwrap_or_default().to_lowercase(),
            address.trim().to_lowercase()
        );
        Self {
            key: format!("{KEY_PREFIX}:geocode:{}", sha256_hex(&material)),
            ttl: GEOCODE_TTL,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.key
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[must_use]
pub fn search_ttl(method: SearchMethod) -> Duration {
    match method {
        SearchMethod::Text => TEXT_TTL,
        SearchMethod::Nearby => NEARBY_TTL,
        SearchMethod::Landmark => LANDMARK_TTL,
    }
}

fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
