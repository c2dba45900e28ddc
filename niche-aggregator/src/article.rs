use crate::types::{AggregatorError, Article, Niche, RawEntry, Result, MAX_DESCRIPTION_CHARS};
use crate::utils::{text, time};
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::warn;

const UNTITLED: &str = "Untitled";
const UNKNOWN_AUTHOR: &str = "Unknown";

/// The entry fields the builder understands. Every field is optional;
/// a present field of the wrong type makes the whole entry malformed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EntryFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

impl EntryFields {
    pub fn from_raw(raw: &RawEntry) -> Result<Self> {
        serde_json::from_value(Value::Object(raw.clone()))
            .map_err(|e| AggregatorError::Entry(e.to_string()))
    }
}

/// Stable article identity: first 16 hex chars of SHA-256 over `"{title}_{url}"`.
pub fn article_id(title: &str, url: &str) -> String {
    let digest = Sha256::digest(format!("{}_{}", title, url).as_bytes());
    hex::encode(&digest[..8])
}

/// Turns raw feed entries into unscored [`Article`]s.
#[derive(Debug, Clone)]
pub struct ArticleBuilder {
    max_description_chars: usize,
}

impl Default for ArticleBuilder {
    fn default() -> Self {
        Self::new(MAX_DESCRIPTION_CHARS)
    }
}

impl ArticleBuilder {
    pub fn new(max_description_chars: usize) -> Self {
        Self {
            max_description_chars,
        }
    }

    /// Build one article with `score = 0` and no keywords.
    pub fn build(&self, raw: &RawEntry, niche: Niche, source_name: &str) -> Result<Article> {
        let fields = EntryFields::from_raw(raw)?;

        let title = text::clean_html(fields.title.as_deref().unwrap_or(UNTITLED));
        let description = text::clean_html(
            fields
                .summary
                .as_deref()
                .or(fields.description.as_deref())
                .unwrap_or_default(),
        );
        let url = fields.link.unwrap_or_default();
        let published = time::normalize_date(
            fields
                .published
                .as_deref()
                .or(fields.updated.as_deref())
                .unwrap_or_default(),
        );

        Ok(Article {
            id: article_id(&title, &url),
            description: text::truncate_chars(&description, self.max_description_chars),
            title,
            url,
            source: source_name.to_string(),
            author: fields.author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            published,
            niche,
            score: 0,
            keywords: Vec::new(),
        })
    }

    /// Build the first `limit` entries, skipping malformed ones.
    pub fn build_all(
        &self,
        entries: &[RawEntry],
        niche: Niche,
        source_name: &str,
        limit: usize,
    ) -> Vec<Article> {
        entries
            .iter()
            .take(limit)
            .filter_map(|raw| match self.build(raw, niche, source_name) {
                Ok(article) => Some(article),
                Err(e) => {
                    warn!("Error parsing entry from {}: {}", source_name, e);
                    None
                }
            })
            .collect()
    }
}
