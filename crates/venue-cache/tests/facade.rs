//! Behaviour of `CacheFacade` against the in-process store and small
//! hand-written store doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use venue_cache::{
    CacheError, CacheFacade, CacheResult, CacheService, Lookup, MemoryCacheService,
    NoOpCacheService, Provenance, StoreLatch,
};

const TTL: Duration = Duration::from_secs(3_600);

#[derive(Debug)]
enum TestError {
    Provider(&'static str),
    Cache(CacheError),
}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::Provider(msg) => write!(f, "provider: {msg}"),
            TestError::Cache(e) => write!(f, "cache: {e}"),
        }
    }
}

impl From<CacheError> for TestError {
    fn from(e: CacheError) -> Self {
        TestError::Cache(e)
    }
}

/// Store whose reads always fail; counts attempted writes.
#[derive(Default)]
struct BrokenStore {
    writes: AtomicUsize,
}

impl CacheService for BrokenStore {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Connection("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> CacheResult<bool> {
        Ok(false)
    }

    fn provider_name(&self) -> &'static str {
        "broken"
    }
}

/// Store whose reads never complete; counts attempted reads.
#[derive(Default)]
struct StalledStore {
    reads: AtomicUsize,
}

impl CacheService for StalledStore {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3_600)).await;
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> CacheResult<bool> {
        Ok(false)
    }

    fn provider_name(&self) -> &'static str {
        "stalled"
    }
}

fn memory_facade(timeout: Duration) -> CacheFacade<MemoryCacheService> {
    CacheFacade::new(MemoryCacheService::new(1_000), timeout)
}

async fn wait_for_entry(store: &MemoryCacheService, key: &str) -> Option<String> {
    for _ in 0..100 {
        if let Some(raw) = store.get(key).await.unwrap() {
            return Some(raw);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    None
}

#[tokio::test]
async fn miss_is_computed_then_served_from_cache() {
    let facade = memory_facade(Duration::from_secs(5));
    let calls = Arc::new(AtomicUsize::new(0));

    let produce = || {
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, TestError>(vec!["a".to_string(), "b".to_string()])
        }
    };

    let first = facade.get_or_compute("k", TTL, produce).await.unwrap();
    assert_eq!(first.provenance, Provenance::Live);
    assert_eq!(first.value, vec!["a", "b"]);

    assert!(wait_for_entry(facade.store(), "k").await.is_some());

    let second = facade.get_or_compute("k", TTL, produce).await.unwrap();
    assert_eq!(second.provenance, Provenance::Cache);
    assert_eq!(second.value, vec!["a", "b"]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn producer_error_propagates_and_is_not_cached() {
    let facade = memory_facade(Duration::from_secs(5));

    let err = facade
        .get_or_compute("k", TTL, || async {
            Err::<Vec<String>, _>(TestError::Provider("HTTP 503"))
        })
        .await
        .unwrap_err();

    assert!(matches!(err, TestError::Provider("HTTP 503")), "{err}");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(facade.store().get("k").await.unwrap(), None);
}

#[tokio::test]
async fn store_read_failure_falls_back_to_direct_call_without_caching() {
    let facade = CacheFacade::new(BrokenStore::default(), Duration::from_secs(5));

    let fetched = facade
        .get_or_compute("k", TTL, || async { Ok::<_, TestError>(7_u32) })
        .await
        .unwrap();

    assert_eq!(fetched.value, 7);
    assert_eq!(fetched.provenance, Provenance::Live);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(facade.store().writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn undecodable_entry_is_treated_as_a_miss() {
    let facade = memory_facade(Duration::from_secs(5));
    facade
        .store()
        .set("k", "{not json", TTL)
        .await
        .unwrap();

    let fetched = facade
        .get_or_compute("k", TTL, || async { Ok::<_, TestError>(1_u8) })
        .await
        .unwrap();

    assert_eq!(fetched.provenance, Provenance::Live);
}

#[tokio::test]
async fn disabled_store_always_calls_producer() {
    let facade = CacheFacade::new(NoOpCacheService::new(), Duration::from_secs(5));
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let calls = Arc::clone(&calls);
        let fetched = facade
            .get_or_compute("k", TTL, move || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, TestError>("v".to_string())
                }
            })
            .await
            .unwrap();
        assert_eq!(fetched.provenance, Provenance::Live);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn fast_producer_returns_without_waiting_for_timer() {
    let facade = memory_facade(Duration::from_secs(3_600));
    let started = tokio::time::Instant::now();

    facade
        .get_or_compute("k", TTL, || async { Ok::<_, TestError>(1_u8) })
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn slow_producer_loses_race_but_still_populates_cache() {
    let facade = memory_facade(Duration::from_secs(1));
    let calls = Arc::new(AtomicUsize::new(0));
    let started = tokio::time::Instant::now();

    let produce = || {
        let calls = Arc::clone(&calls);
        async move {
            // Only the first (detached) run is slow.
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_secs(10)).await;
                return Ok::<_, TestError>("detached".to_string());
            }
            Ok("direct".to_string())
        }
    };

    let fetched = facade.get_or_compute("k", TTL, produce).await.unwrap();
    assert_eq!(fetched.value, "direct");
    assert!(started.elapsed() < Duration::from_secs(10));

    tokio::time::sleep(Duration::from_secs(20)).await;
    let raw = facade.store().get("k").await.unwrap().expect("detached write");
    assert!(raw.contains("detached"), "{raw}");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

async fn explode() -> Result<Vec<u32>, TestError> {
    panic!("producer blew up")
}

#[tokio::test]
async fn panicking_producer_reports_aborted() {
    let facade = memory_facade(Duration::from_secs(5));

    let err = facade.get_or_compute("k", TTL, explode).await.unwrap_err();

    assert!(
        matches!(err, TestError::Cache(CacheError::ProducerAborted(_))),
        "{err}"
    );
}

#[tokio::test(start_paused = true)]
async fn tripped_latch_skips_the_store_for_later_lookups() {
    let facade = CacheFacade::new(StalledStore::default(), Duration::from_millis(500));
    let latch = StoreLatch::new();
    let started = tokio::time::Instant::now();

    let first = facade
        .get_or_compute_latched(&latch, "first", TTL, || async { Ok::<_, TestError>(1) })
        .await
        .unwrap();
    let second = facade
        .get_or_compute_latched(&latch, "second", TTL, || async { Ok::<_, TestError>(2) })
        .await
        .unwrap();

    assert_eq!((first.value, first.provenance), (1, Provenance::Live));
    assert_eq!((second.value, second.provenance), (2, Provenance::Live));
    assert!(latch.is_tripped());
    assert_eq!(facade.store().reads.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn lookup_reports_hit_miss_and_unavailable() {
    let facade = memory_facade(Duration::from_secs(1));
    facade
        .get_or_compute("warm", TTL, || async { Ok::<_, TestError>(7_u32) })
        .await
        .unwrap();
    wait_for_entry(facade.store(), "warm").await.expect("entry written");

    assert!(matches!(facade.lookup::<u32>("warm").await, Lookup::Hit(7)));
    assert!(matches!(facade.lookup::<u32>("cold").await, Lookup::Miss));

    let broken = CacheFacade::new(BrokenStore::default(), Duration::from_secs(1));
    assert!(matches!(
        broken.lookup::<u32>("any").await,
        Lookup::Unavailable(CacheError::Connection(_))
    ));
}

#[tokio::test]
async fn unencodable_value_is_returned_but_not_cached() {
    use std::collections::HashMap;

    let facade = memory_facade(Duration::from_secs(1));
    let fetched = facade
        .get_or_compute("tuple-keys", TTL, || async {
            let mut value = HashMap::new();
            value.insert((1_u8, 2_u8), 3_u8);
            Ok::<_, TestError>(value)
        })
        .await
        .unwrap();

    assert_eq!(fetched.provenance, Provenance::Live);
    assert_eq!(fetched.value.get(&(1, 2)), Some(&3));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(facade.store().get("tuple-keys").await.unwrap().is_none());
}
