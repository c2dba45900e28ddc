use crate::article::ArticleBuilder;
use crate::scoring::{RelevanceScorer, MAX_SCORE};
use crate::traits::FeedSource;
use crate::types::{AggregationConfig, Article, Niche, Priority, Source};
use crate::utils;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Apply a source's priority multiplier to a base score.
/// The product is truncated toward zero, then capped at 100.
pub fn apply_priority(base: u8, priority: Priority) -> u8 {
    let weighted = (base as f64 * priority.multiplier()) as u32;
    weighted.min(MAX_SCORE as u32) as u8
}

/// An article waiting for scoring, with the priority of the source it came from.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub article: Article,
    pub priority: Priority,
}

/// Fetches, scores and ranks the articles of one niche.
pub struct NicheAggregator {
    feeds: Arc<dyn FeedSource>,
    scorer: RelevanceScorer,
    builder: ArticleBuilder,
    config: AggregationConfig,
}

impl NicheAggregator {
    pub fn new(feeds: Arc<dyn FeedSource>, scorer: RelevanceScorer, config: AggregationConfig) -> Self {
        Self {
            feeds,
            scorer,
            builder: ArticleBuilder::new(config.max_description_chars),
            config,
        }
    }

    pub async fn aggregate(&self, niche: Niche, sources: &[Source]) -> Vec<Article> {
        self.aggregate_at(niche, sources, Utc::now()).await
    }

    /// Aggregate `sources` for `niche`, scoring freshness relative to `now`.
    pub async fn aggregate_at(&self, niche: Niche, sources: &[Source], now: DateTime<Utc>) -> Vec<Article> {
        info!("Processing niche: {} ({} sources)", niche.as_str().to_uppercase(), sources.len());
        debug!("Fetching through {}", self.feeds.source_name());

        let candidates = self.collect(niche, sources).await;
        info!("Processing {} articles for {}...", candidates.len(), niche);

        let ranked = self.rank(niche, candidates, now);
        info!(
            "Kept top {} articles (max score: {})",
            ranked.len(),
            ranked.first().map(|a| a.score).unwrap_or(0)
        );
        ranked
    }

    /// Fetch every source with a url. Output keeps configuration order
    /// regardless of how many fetches overlap.
    pub async fn collect(&self, niche: Niche, sources: &[Source]) -> Vec<Candidate> {
        let per_source: Vec<Vec<Candidate>> = stream::iter(sources.iter().filter(|s| s.feed_url().is_some()))
            .map(|source| self.collect_source(niche, source))
            .buffered(self.config.max_concurrent_fetches.max(1))
            .collect()
            .await;

        per_source.into_iter().flatten().collect()
    }

    async fn collect_source(&self, niche: Niche, source: &Source) -> Vec<Candidate> {
        let Some(url) = source.feed_url() else {
            return Vec::new();
        };

        info!("Fetching {}...", url);
        let feed = match self.feeds.fetch(url, self.config.max_articles_per_source).await {
            Ok(feed) => feed,
            Err(e) => {
                error!("Error fetching {}: {}", url, e);
                return Vec::new();
            }
        };

        let source_name = source
            .display_name()
            .map(str::to_string)
            .or_else(|| feed.feed_title.clone().filter(|t| !t.trim().is_empty()))
            .or_else(|| utils::url::extract_netloc(url))
            .unwrap_or_else(|| url.to_string());

        let articles = self.builder.build_all(
            &feed.entries,
            niche,
            &source_name,
            self.config.max_articles_per_source,
        );
        info!("Fetched {} articles from {}", articles.len(), source_name);

        articles
            .into_iter()
            .map(|article| Candidate {
                article,
                priority: source.priority,
            })
            .collect()
    }

    /// Score, weight, stable-sort by score descending and cap.
    pub fn rank(&self, niche: Niche, candidates: Vec<Candidate>, now: DateTime<Utc>) -> Vec<Article> {
        let mut articles: Vec<Article> = candidates
            .into_iter()
            .map(|Candidate { mut article, priority }| {
                let base = self.scorer.score_at(&article, niche, now);
                article.keywords = self.scorer.extract_keywords(&article, niche);
                article.score = apply_priority(base, priority);
                article
            })
            .collect();

        articles.sort_by(|a, b| b.score.cmp(&a.score));
        articles.truncate(self.config.max_articles_per_niche);
        articles
    }
}
