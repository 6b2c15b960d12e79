//! Bounded-time "fetch from cache or compute" wrapper.
//!
//! On a miss the producer runs as a detached task that always finishes:
//! it logs its own outcome and writes successful values to the store even
//! after the caller has given up waiting. The caller only awaits the race
//! between that task's result channel and the facade timeout.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::errors::CacheError;
use crate::traits::CacheService;

/// Where a value handed back by the facade came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Cache,
    Live,
}

/// A value plus its [`Provenance`].
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Fetched<T> {
    fn live(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Live,
        }
    }

    fn cached(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Cache,
        }
    }
}

/// Outcome of a store-only read.
#[derive(Debug)]
pub enum Lookup<T> {
    Hit(T),
    Miss,
    /// The store failed or did not answer within the facade timeout.
    Unavailable(CacheError),
}

/// Flag shared by every lookup of one request. Once tripped, later lookups
/// skip the store and call their producer directly.
#[derive(Debug, Clone, Default)]
pub struct StoreLatch(Arc<AtomicBool>);

impl StoreLatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trip(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Stored representation of a cached value.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope<T> {
    stored_at: DateTime<Utc>,
    value: T,
}

/// Cache-or-produce wrapper around a [`CacheService`].
#[derive(Debug)]
pub struct CacheFacade<S> {
    store: Arc<S>,
    timeout: Duration,
}

impl<S> Clone for CacheFacade<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            timeout: self.timeout,
        }
    }
}

impl<S> CacheFacade<S>
where
    S: CacheService + 'static,
{
    #[must_use]
    pub fn new(store: S, timeout: Duration) -> Self {
        Self {
            store: Arc::new(store),
            timeout,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Reads `key` without producing anything on a miss.
    ///
    /// A disabled store always reports [`Lookup::Miss`].
    pub async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Lookup<T> {
        if !self.store.is_enabled() {
            return Lookup::Miss;
        }
        match self.read(key).await {
            Ok(Some(value)) => Lookup::Hit(value),
            Ok(None) => Lookup::Miss,
            Err(e) => Lookup::Unavailable(e),
        }
    }

    /// [`Self::get_or_compute_latched`] with a latch private to this call.
    ///
    /// # Errors
    ///
    /// As for [`Self::get_or_compute_latched`].
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<Fetched<T>, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + DeserializeOwned + Send + 'static,
        E: From<CacheError> + Display + Send + 'static,
    {
        self.get_or_compute_latched(&StoreLatch::new(), key, ttl, producer)
            .await
    }

    /// Returns the cached value for `key`, or runs `producer` and caches its
    /// success for `ttl`.
    ///
    /// - With `latch` already tripped the store is not touched; `producer()`
    ///   is called directly and its result is not cached.
    /// - A store read failure (or a read slower than the facade timeout)
    ///   trips `latch` and falls back to one direct `producer()` call whose
    ///   result is not cached here.
    /// - On a miss the producer runs detached. If it does not report back
    ///   within the facade timeout the caller stops waiting and makes one
    ///   direct call; the detached run still completes and fills the cache.
    /// - Producer errors are returned unchanged and never cached.
    ///
    /// # Errors
    ///
    /// Returns whatever `producer` returns on failure, or
    /// [`CacheError::ProducerAborted`] (converted into `E`) if the detached
    /// producer task panicked.
    pub async fn get_or_compute_latched<T, E, F, Fut>(
        &self,
        latch: &StoreLatch,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<Fetched<T>, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + DeserializeOwned + Send + 'static,
        E: From<CacheError> + Display + Send + 'static,
    {
        if latch.is_tripped() {
            debug!(key, "cache store already failed for this request; bypassing");
            return producer().await.map(Fetched::live);
        }

        match self.lookup(key).await {
            Lookup::Hit(value) => return Ok(Fetched::cached(value)),
            Lookup::Miss => {}
            Lookup::Unavailable(e) => {
                latch.trip();
                warn!(key, error = %e, "cache read failed; calling provider directly");
                return producer().await.map(Fetched::live);
            }
        }

        if !self.store.is_enabled() {
            return producer().await.map(Fetched::live);
        }

        let rx = self.spawn_producer(key, ttl, producer());

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(outcome)) => outcome.map(Fetched::live),
            Ok(Err(_)) => Err(E::from(CacheError::ProducerAborted(key.to_owned()))),
            Err(_) => {
                warn!(
                    key,
                    timeout_ms = duration_ms(self.timeout),
                    "cache producer exceeded timeout; calling provider directly"
                );
                producer().await.map(Fetched::live)
            }
        }
    }

    /// Reads and decodes one entry. Undecodable entries count as misses.
    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let raw = tokio::time::timeout(self.timeout, self.store.get(key))
            .await
            .map_err(|_| CacheError::Timeout(duration_ms(self.timeout)))??;

        let Some(raw) = raw else {
            debug!(key, "cache miss");
            return Ok(None);
        };

        match serde_json::from_str::<CacheEnvelope<T>>(&raw) {
            Ok(envelope) => {
                let age_secs = (Utc::now() - envelope.stored_at).num_seconds();
                debug!(key, age_secs, "cache hit");
                Ok(Some(envelope.value))
            }
            Err(e) => {
                warn!(key, error = %e, "undecodable cache entry; treating as miss");
                Ok(None)
            }
        }
    }

    /// Runs `fut` as a detached task that reports on a oneshot channel and
    /// then writes a successful value to the store.
    fn spawn_producer<T, E, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fut: Fut,
    ) -> oneshot::Receiver<Result<T, E>>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Serialize + Send + 'static,
        E: Display + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let store = Arc::clone(&self.store);
        let key = key.to_owned();

        tokio::spawn(async move {
            let outcome = fut.await;

            let failure = outcome.as_ref().err().map(ToString::to_string);
            let payload = outcome.as_ref().ok().map(encode_entry);
            let delivered = tx.send(outcome).is_ok();

            match (failure, delivered) {
                (Some(error), true) => {
                    debug!(key = %key, %error, "cache producer failed; nothing cached");
                }
                (Some(error), false) => {
                    warn!(key = %key, %error, "abandoned cache producer failed; nothing cached");
                }
                (None, false) => debug!(key = %key, "abandoned cache producer finished"),
                (None, true) => {}
            }

            match payload {
                Some(Ok(payload)) => {
                    if let Err(e) = store.set(&key, &payload, ttl).await {
                        warn!(key = %key, error = %e, "cache write failed");
                    } else {
                        debug!(key = %key, ttl_secs = ttl.as_secs(), "cache populated");
                    }
                }
                Some(Err(e)) => {
                    warn!(key = %key, error = %e, "cache value serialization failed");
                }
                None => {}
            }
        });

        rx
    }
}

/// Wraps `value` in a timestamped envelope and encodes it for the store.
fn encode_entry<T: Serialize>(value: &T) -> Result<String, CacheError> {
    serde_json::to_string(&CacheEnvelope {
        stored_at: Utc::now(),
        value,
    })
    .map_err(|e| CacheError::Serialization(e.to_string()))
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
