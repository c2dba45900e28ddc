use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Entries considered per feed.
pub const MAX_ARTICLES_PER_SOURCE: usize = 10;
/// Articles kept in a niche's output.
pub const MAX_ARTICLES_PER_NICHE: usize = 100;
/// Stored description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Topical bucket owning a keyword table and an output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Niche {
    Ai,
    Security,
    Dev,
    Php,
    Angular,
    Spring,
    Finance,
}

impl Niche {
    /// Every niche, in processing order.
    pub const ALL: [Niche; 7] = [
        Niche::Ai,
        Niche::Security,
        Niche::Dev,
        Niche::Php,
        Niche::Angular,
        Niche::Spring,
        Niche::Finance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Niche::Ai => "ai",
            Niche::Security => "security",
            Niche::Dev => "dev",
            Niche::Php => "php",
            Niche::Angular => "angular",
            Niche::Spring => "spring",
            Niche::Finance => "finance",
        }
    }
}

impl fmt::Display for Niche {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Niche {
    type Err = AggregatorError;

    fn from_str(s: &str) -> Result<Self> {
        Niche::ALL
            .into_iter()
            .find(|niche| niche.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AggregatorError::UnknownNiche(s.to_string()))
    }
}

/// Weight a source's articles receive after base scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Low,
    #[default]
    #[serde(other)]
    Medium,
}

impl Priority {
    pub fn multiplier(&self) -> f64 {
        match self {
            Priority::High => 1.2,
            Priority::Medium => 1.0,
            Priority::Low => 0.8,
        }
    }
}

/// Any value other than `"high"` or `"low"`, including null and numbers, is medium.
fn lenient_priority<'de, D>(deserializer: D) -> std::result::Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value.as_str() {
        Some("high") => Priority::High,
        Some("low") => Priority::Low,
        _ => Priority::Medium,
    })
}

/// One configured feed endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
}

impl Source {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// The feed url, if configured and non-empty.
    pub fn feed_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// The display name override, if configured and non-empty.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.trim().is_empty())
    }
}

/// Canonical article record, as written to a niche's output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub author: String,
    pub published: String,
    pub niche: Niche,
    pub score: u8,
    pub keywords: Vec<String>,
}

/// Output document for one niche.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicheResult {
    pub last_updated: String,
    pub total_articles: usize,
    pub articles: Vec<Article>,
}

impl NicheResult {
    pub fn new(articles: Vec<Article>, last_updated: DateTime<Utc>) -> Self {
        Self {
            last_updated: crate::utils::time::format_timestamp(last_updated),
            total_articles: articles.len(),
            articles,
        }
    }
}

/// Loosely-typed feed entry as handed over by a feed source.
pub type RawEntry = serde_json::Map<String, serde_json::Value>;

/// A decoded feed: its title plus its raw entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFeed {
    pub feed_title: Option<String>,
    pub entries: Vec<RawEntry>,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_feed_size_mb: usize,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Niche-Aggregator/1.0".to_string(),
            timeout_seconds: 30,
            max_feed_size_mb: 10,
            follow_redirects: true,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AggregationConfig {
    pub max_articles_per_source: usize,
    pub max_articles_per_niche: usize,
    pub max_description_chars: usize,
    /// Feeds of one niche fetched at the same time. 1 means strictly sequential.
    pub max_concurrent_fetches: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_articles_per_source: MAX_ARTICLES_PER_SOURCE,
            max_articles_per_niche: MAX_ARTICLES_PER_NICHE,
            max_description_chars: MAX_DESCRIPTION_CHARS,
            max_concurrent_fetches: 4,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to load config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("Malformed entry: {0}")]
    Entry(String),

    #[error("Unknown niche: {0}")]
    UnknownNiche(String),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
