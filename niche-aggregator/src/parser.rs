use crate::types::{AggregatorError, RawEntry, RawFeed, Result};
use feed_rs::parser;
use serde_json::Value;
use tracing::{debug, info};

/// Decodes RSS, Atom and JSON Feed documents into [`RawFeed`]s.
#[derive(Debug, Default, Clone)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse `content`, keeping only the first `limit` entries.
    pub fn parse_feed(&self, content: &[u8], limit: usize) -> Result<RawFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content)
            .map_err(|e| AggregatorError::Parse(format!("Failed to parse feed: {}", e)))?;

        let feed_title = feed
            .title
            .map(|t| t.content.trim().to_string())
            .filter(|t| !t.is_empty());

        let total = feed.entries.len();
        let entries: Vec<RawEntry> = feed
            .entries
            .into_iter()
            .take(limit)
            .map(Self::parse_entry)
            .collect();

        info!("Parsed feed with {} entries (kept {})", total, entries.len());

        Ok(RawFeed {
            feed_title,
            entries,
        })
    }

    /// Map a decoded entry onto the loose field names the article builder reads.
    fn parse_entry(entry: feed_rs::model::Entry) -> RawEntry {
        let mut raw = RawEntry::new();

        if let Some(title) = entry.title {
            raw.insert("title".to_string(), Value::String(title.content));
        }
        if let Some(summary) = entry.summary {
            raw.insert("summary".to_string(), Value::String(summary.content));
        }
        if let Some(body) = entry.content.and_then(|c| c.body) {
            raw.insert("description".to_string(), Value::String(body));
        }
        if let Some(link) = entry.links.into_iter().next() {
            raw.insert("link".to_string(), Value::String(link.href));
        }
        if let Some(author) = entry.authors.into_iter().next() {
            raw.insert("author".to_string(), Value::String(author.name));
        }
        if let Some(published) = entry.published {
            raw.insert("published".to_string(), Value::String(published.to_rfc3339()));
        }
        if let Some(updated) = entry.updated {
            raw.insert("updated".to_string(), Value::String(updated.to_rfc3339()));
        }

        raw
    }

    /// Cheap check that a body looks like a feed before handing it to the parser.
    pub fn is_valid_feed_content(content: &str) -> bool {
        let content_lower = content.to_lowercase();

        content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("<rdf:rdf")
            || content_lower.contains("<channel")
            || content_lower.contains("jsonfeed.org/version")
    }
}
