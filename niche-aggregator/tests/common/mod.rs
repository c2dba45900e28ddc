// Shared fixtures for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use niche_aggregator::{AggregatorError, Article, FeedSource, Niche, RawEntry, RawFeed, Result};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Reference instant used wherever scoring depends on the clock.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// Turn a `json!({...})` object into a raw feed entry.
pub fn entry(value: Value) -> RawEntry {
    match value {
        Value::Object(map) => map,
        other => panic!("entry fixture must be a JSON object, got {}", other),
    }
}

pub fn article(title: &str, description: &str, source: &str, url: &str, published: &str) -> Article {
    Article {
        id: niche_aggregator::article_id(title, url),
        title: title.to_string(),
        description: description.to_string(),
        url: url.to_string(),
        source: source.to_string(),
        author: "Unknown".to_string(),
        published: published.to_string(),
        niche: Niche::Security,
        score: 0,
        keywords: Vec::new(),
    }
}

/// In-memory feed source keyed by url. Records every request it receives
/// and hands back whole feeds, ignoring the entry limit.
#[derive(Default)]
pub struct StubFeedSource {
    feeds: HashMap<String, RawFeed>,
    failing: HashSet<String>,
    requests: Mutex<Vec<(String, usize)>>,
}

impl StubFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, feed_title: Option<&str>, entries: Vec<RawEntry>) -> Self {
        self.feeds.insert(
            url.to_string(),
            RawFeed {
                feed_title: feed_title.map(str::to_string),
                entries,
            },
        );
        self
    }

    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn requests(&self) -> Vec<(String, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for StubFeedSource {
    fn source_name(&self) -> String {
        "stub".to_string()
    }

    async fn fetch(&self, url: &str, limit: usize) -> Result<RawFeed> {
        self.requests.lock().unwrap().push((url.to_string(), limit));

        if self.failing.contains(url) {
            return Err(AggregatorError::General(format!("connection refused: {}", url)));
        }

        self.feeds
            .get(url)
            .cloned()
            .ok_or_else(|| AggregatorError::Parse(format!("no feed registered for {}", url)))
    }
}
