//! Remote data source trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// A remote (or local) source that produces one route payload per fetch.
///
/// Implementations perform the full upstream round-trip every time
/// [`Upstream::fetch`] is called; caching is layered on top by the caller.
#[async_trait]
pub trait Upstream: Send + Sync + std::fmt::Debug + 'static {
    /// The payload produced by a successful fetch.
    type Output: Clone + Send + Sync + 'static;

    /// Short name used in logs (e.g. `"github_stats"`).
    fn name(&self) -> &'static str;

    /// Fetch a fresh payload from the upstream service.
    async fn fetch(&self) -> AppResult<Self::Output>;
}
