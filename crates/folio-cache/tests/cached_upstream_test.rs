//! Integration tests for a cached upstream route payload.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use folio_cache::{CachedUpstream, Freshness};
use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_core::traits::upstream::Upstream;

const WINDOW: Duration = Duration::from_secs(30 * 60);

/// Counts calls and returns `{"call": n}`, or fails while `failing` is set.
#[derive(Debug, Default)]
struct CountingSource {
    calls: AtomicUsize,
    failing: AtomicBool,
}

#[async_trait]
impl Upstream for CountingSource {
    type Output = Value;

    fn name(&self) -> &'static str {
        "counting"
    }

    async fn fetch(&self) -> AppResult<Value> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::external_service("upstream unavailable"));
        }
        Ok(json!({ "call": n }))
    }
}

fn setup() -> (Arc<CountingSource>, CachedUpstream<Value>) {
    let source = Arc::new(CountingSource::default());
    let cached = CachedUpstream::new(source.clone(), WINDOW);
    (source, cached)
}

#[tokio::test(start_paused = true)]
async fn test_repeat_get_inside_window_is_byte_identical() {
    let (source, cached) = setup();

    let first = cached.get().await.unwrap();
    let second = cached.get().await.unwrap();

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        serde_json::to_vec(&first.value).unwrap(),
        serde_json::to_vec(&second.value).unwrap()
    );
    assert_eq!(second.freshness, Freshness::Fresh);
}

#[tokio::test(start_paused = true)]
async fn test_get_after_window_makes_exactly_one_call() {
    let (source, cached) = setup();
    cached.get().await.unwrap();

    tokio::time::advance(WINDOW + Duration::from_secs(1)).await;
    let refreshed = cached.get().await.unwrap();
    let again = cached.get().await.unwrap();

    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    assert_eq!(refreshed.value, json!({ "call": 2 }));
    assert_eq!(again.freshness, Freshness::Fresh);
}

#[tokio::test(start_paused = true)]
async fn test_upstream_failure_serves_previous_payload() {
    let (source, cached) = setup();
    cached.get().await.unwrap();

    source.failing.store(true, Ordering::SeqCst);
    tokio::time::advance(WINDOW * 4).await;
    let served = cached.get().await.unwrap();

    assert_eq!(served.value, json!({ "call": 1 }));
    assert_eq!(served.freshness, Freshness::Stale);
}

#[tokio::test(start_paused = true)]
async fn test_upstream_failure_without_history_is_an_error() {
    let (source, cached) = setup();
    source.failing.store(true, Ordering::SeqCst);

    let err = cached.get().await.unwrap_err();
    assert_eq!(err.message, "upstream unavailable");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_gets_share_one_refresh() {
    let (source, cached) = setup();
    let cached = Arc::new(cached);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cached = cached.clone();
            tokio::spawn(async move { cached.get().await.unwrap().value })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), json!({ "call": 1 }));
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}
