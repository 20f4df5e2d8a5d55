//! An upstream source paired with its response cache.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use folio_core::result::AppResult;
use folio_core::traits::upstream::Upstream;

use crate::response::{ResponseCache, Served};

/// Serves an [`Upstream`] through a [`ResponseCache`].
pub struct CachedUpstream<T> {
    /// The source called on a cache miss.
    source: Arc<dyn Upstream<Output = T>>,
    /// The route's single slot.
    cache: ResponseCache<T>,
}

impl<T: Clone + Send + Sync + 'static> CachedUpstream<T> {
    /// Wrap `source` with a cache that stays fresh for `window`.
    pub fn new(source: Arc<dyn Upstream<Output = T>>, window: Duration) -> Self {
        let cache = ResponseCache::new(source.name(), window);
        Self { source, cache }
    }

    /// Get the route payload, calling the upstream only when needed.
    pub async fn get(&self) -> AppResult<Served<T>> {
        let source = &self.source;
        self.cache.get_or_refresh(|| source.fetch()).await
    }

    /// Name of the underlying source.
    pub fn name(&self) -> &'static str {
        self.source.name()
    }
}

impl<T> fmt::Debug for CachedUpstream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedUpstream")
            .field("source", &self.source)
            .field("cache", &self.cache)
            .finish()
    }
}
