//! Remote trend feed collaborator.

use crate::error::Result;
use crate::types::Trend;

/// Source of the trend working list.
///
/// The concrete transport (HTTP client, fixture server) lives outside this
/// crate; sessions receive the feed as `Arc<dyn TrendFeed>`. A failed fetch
/// surfaces as [`StoreError::Fetch`](crate::StoreError::Fetch) and the
/// store degrades to "no change" rather than raising to the UI. Timeouts,
/// if any, belong to the implementation.
pub trait TrendFeed: Send + Sync {
    /// Fetch the current trending list. May block the calling thread.
    fn fetch_trends(&self) -> Result<Vec<Trend>>;
}
