//! Single-slot response cache with a freshness window.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use folio_core::result::AppResult;

/// How a served payload was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Served from a success younger than the window; no upstream call.
    Fresh,
    /// Produced by a new, successful upstream call.
    Refreshed,
    /// The upstream call failed; the previous success was served instead.
    Stale,
}

impl Freshness {
    /// Converts to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Refreshed => "refreshed",
            Self::Stale => "stale",
        }
    }
}

/// A payload together with how it was obtained.
#[derive(Debug, Clone)]
pub struct Served<T> {
    /// The payload.
    pub value: T,
    /// Where the payload came from.
    pub freshness: Freshness,
}

struct CachedEntry<T> {
    value: T,
    refreshed_at: Instant,
}

/// Holds the last successful payload of one route.
///
/// The slot is locked for the whole refresh, so concurrent requests queue
/// behind a single upstream call instead of issuing their own.
pub struct ResponseCache<T> {
    name: &'static str,
    window: Duration,
    slot: Mutex<Option<CachedEntry<T>>>,
}

impl<T: Clone> ResponseCache<T> {
    /// Create an empty cache whose entries stay fresh for `window`.
    pub fn new(name: &'static str, window: Duration) -> Self {
        Self {
            name,
            window,
            slot: Mutex::new(None),
        }
    }

    /// Serve the cached payload if fresh, otherwise run `refresh`.
    ///
    /// A failed refresh falls back to the previous payload of any age; with
    /// nothing cached the refresh error is returned.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> AppResult<Served<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.as_ref() {
            let age = entry.refreshed_at.elapsed();
            if age < self.window {
                debug!(cache = self.name, age_secs = age.as_secs(), "Serving cached payload");
                return Ok(Served {
                    value: entry.value.clone(),
                    freshness: Freshness::Fresh,
                });
            }
        }

        match refresh().await {
            Ok(value) => {
                *slot = Some(CachedEntry {
                    value: value.clone(),
                    refreshed_at: Instant::now(),
                });
                debug!(cache = self.name, "Cache refreshed from upstream");
                Ok(Served {
                    value,
                    freshness: Freshness::Refreshed,
                })
            }
            Err(err) => match slot.as_ref() {
                Some(entry) => {
                    warn!(
                        cache = self.name,
                        error = %err,
                        age_secs = entry.refreshed_at.elapsed().as_secs(),
                        "Upstream refresh failed, serving stale payload"
                    );
                    Ok(Served {
                        value: entry.value.clone(),
                        freshness: Freshness::Stale,
                    })
                }
                None => {
                    warn!(cache = self.name, error = %err, "Upstream refresh failed with nothing cached");
                    Err(err)
                }
            },
        }
    }

    /// Returns the cached payload without refreshing, if any.
    #[cfg(test)]
    async fn peek(&self) -> Option<T> {
        self.slot.lock().await.as_ref().map(|e| e.value.clone())
    }
}

impl<T> fmt::Debug for ResponseCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("name", &self.name)
            .field("window", &self.window)
            .finish()
    }
}
