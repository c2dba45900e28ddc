use crate::types::{RawFeed, Result};
use async_trait::async_trait;

/// Trait for retrieving a syndicated feed and decoding it into raw entries
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable name for this transport, used in logs
    fn source_name(&self) -> String;

    /// Fetch the feed at `url`, returning at most `limit` entries in feed order.
    /// Errors are source-level: the caller treats them as an empty feed.
    async fn fetch(&self, url: &str, limit: usize) -> Result<RawFeed>;
}
