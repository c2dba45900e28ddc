//! Relevance model: four capped bands summed into a 0-100 base score.

use crate::types::{Article, Niche};
use crate::utils::time;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

pub const KEYWORD_CAP: u32 = 40;
pub const FRESHNESS_CAP: u8 = 30;
pub const AUTHORITY_CAP: u8 = 20;
pub const RICHNESS_CAP: u8 = 10;
pub const MAX_SCORE: u8 = 100;
pub const MAX_KEYWORDS: usize = 5;

const HIGH_WEIGHT: u32 = 10;
const MEDIUM_WEIGHT: u32 = 3;
const LOW_WEIGHT: u32 = 1;

/// Freshness when the age is a week or more, or unknown.
const STALE_FRESHNESS: u8 = 10;
const UNTRUSTED_AUTHORITY: u8 = 5;

/// A niche's keyword lists, matched as case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordTiers {
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
    #[serde(default)]
    pub low: Vec<String>,
}

impl KeywordTiers {
    pub fn new(high: &[&str], medium: &[&str], low: &[&str]) -> Self {
        let owned = |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            high: owned(high),
            medium: owned(medium),
            low: owned(low),
        }
    }

    /// Every keyword with its weight, high tier first.
    fn weighted(&self) -> impl Iterator<Item = (&str, u32)> {
        self.high
            .iter()
            .map(|k| (k.as_str(), HIGH_WEIGHT))
            .chain(self.medium.iter().map(|k| (k.as_str(), MEDIUM_WEIGHT)))
            .chain(self.low.iter().map(|k| (k.as_str(), LOW_WEIGHT)))
    }
}

/// Tables driving the scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub keywords: HashMap<Niche, KeywordTiers>,
    /// Publisher fragments matched against source name and url.
    pub trusted_sources: Vec<String>,
}

impl ScoringConfig {
    /// No keyword tables and no trusted sources.
    pub fn empty() -> Self {
        Self {
            keywords: HashMap::new(),
            trusted_sources: Vec::new(),
        }
    }

    pub fn with_keywords(mut self, niche: Niche, tiers: KeywordTiers) -> Self {
        self.keywords.insert(niche, tiers);
        self
    }

    pub fn with_trusted_sources(mut self, trusted: &[&str]) -> Self {
        self.trusted_sources = trusted.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn tiers(&self, niche: Niche) -> Option<&KeywordTiers> {
        self.keywords.get(&niche)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::empty()
            .with_keywords(
                Niche::Ai,
                KeywordTiers::new(
                    &["GPT", "Claude", "LLM", "transformer", "neural network", "AGI", "OpenAI", "Anthropic"],
                    &["machine learning", "deep learning", "AI", "artificial intelligence", "model"],
                    &["algorithm", "data", "prediction", "automation"],
                ),
            )
            .with_keywords(
                Niche::Security,
                KeywordTiers::new(
                    &[
                        "zero-day", "CVE-", "vulnerability", "exploit", "ransomware", "breach",
                        "RCE", "XSS", "SQL injection", "CSRF", "XXE", "SSRF", "authentication bypass",
                        "remote code execution", "privilege escalation", "critical vulnerability",
                        "security flaw", "web vulnerability", "OWASP",
                    ],
                    &[
                        "security", "malware", "phishing", "attack", "threat", "patch", "disclosure",
                        "security advisory", "PoC", "proof of concept", "bug bounty", "penetration test",
                        "vulnerability scanner", "web application security", "injection",
                    ],
                    &["cybersecurity", "protection", "firewall", "encryption", "secure"],
                ),
            )
            .with_keywords(
                Niche::Dev,
                KeywordTiers::new(
                    &[
                        "Angular 19", "Angular 18", "PHP 8.4", "PHP 8.3", "Spring Boot 4", "Spring Boot 3",
                        "Laravel 11", "Symfony 7", "TypeScript 5", "React 19",
                        "Spring Framework", "Spring Security", "Spring Data",
                    ],
                    &[
                        "Angular", "PHP", "Spring", "framework", "library", "API", "performance", "release",
                        "Laravel", "Symfony", "Composer", "dependency injection", "reactive programming",
                        "microservices", "REST API", "GraphQL",
                    ],
                    &["development", "programming", "code", "developer", "tutorial", "best practices"],
                ),
            )
            .with_keywords(
                Niche::Finance,
                KeywordTiers::new(
                    &["Bitcoin", "blockchain", "DeFi", "fintech", "cryptocurrency"],
                    &["payment", "banking", "trading", "investment", "wallet"],
                    &["finance", "market", "transaction", "digital"],
                ),
            )
            .with_trusted_sources(&[
                "techcrunch", "wired", "thehackernews", "bleeping", "ars technica",
                "mit technology review", "bloomberg", "reuters", "venturebeat",
                "android", "google", "microsoft", "openai", "anthropic",
                "github", "spring", "angular", "react",
            ])
    }
}

/// Per-band points behind a base score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBreakdown {
    pub keyword: u8,
    pub freshness: u8,
    pub authority: u8,
    pub richness: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        let sum = self.keyword as u32
            + self.freshness as u32
            + self.authority as u32
            + self.richness as u32;
        sum.min(MAX_SCORE as u32) as u8
    }
}

pub struct RelevanceScorer {
    config: ScoringConfig,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl RelevanceScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Base score of `article` for `niche`, relative to the current time.
    pub fn score(&self, article: &Article, niche: Niche) -> u8 {
        self.score_at(article, niche, Utc::now())
    }

    pub fn score_at(&self, article: &Article, niche: Niche, now: DateTime<Utc>) -> u8 {
        self.breakdown_at(article, niche, now).total()
    }

    pub fn breakdown_at(&self, article: &Article, niche: Niche, now: DateTime<Utc>) -> ScoreBreakdown {
        let content = searchable_content(article);
        ScoreBreakdown {
            keyword: self.keyword_points(&content, niche),
            freshness: freshness_points(&article.published, now),
            authority: self.authority_points(article),
            richness: richness_points(&article.description),
        }
    }

    /// Matching keyword literals, high tier first, de-duplicated, at most five.
    pub fn extract_keywords(&self, article: &Article, niche: Niche) -> Vec<String> {
        let Some(tiers) = self.config.tiers(niche) else {
            return Vec::new();
        };
        let content = searchable_content(article);

        let mut keywords: Vec<String> = Vec::new();
        for (keyword, _) in tiers.weighted() {
            if keywords.len() == MAX_KEYWORDS {
                break;
            }
            if content.contains(&keyword.to_lowercase()) && !keywords.iter().any(|k| k == keyword) {
                keywords.push(keyword.to_string());
            }
        }
        keywords
    }

    fn keyword_points(&self, content: &str, niche: Niche) -> u8 {
        let Some(tiers) = self.config.tiers(niche) else {
            return 0;
        };

        let points: u32 = tiers
            .weighted()
            .filter(|(keyword, _)| content.contains(&keyword.to_lowercase()))
            .map(|(_, weight)| weight)
            .sum();

        points.min(KEYWORD_CAP) as u8
    }

    fn authority_points(&self, article: &Article) -> u8 {
        let source = article.source.to_lowercase();
        let url = article.url.to_lowercase();

        let trusted = self.config.trusted_sources.iter().find(|trusted| {
            let trusted = trusted.to_lowercase();
            source.contains(&trusted) || url.contains(&trusted)
        });

        match trusted {
            Some(name) => {
                debug!("Source '{}' matched trusted publisher '{}'", article.source, name);
                AUTHORITY_CAP
            }
            None => UNTRUSTED_AUTHORITY,
        }
    }
}

fn searchable_content(article: &Article) -> String {
    format!("{} {}", article.title, article.description).to_lowercase()
}

/// Points for recency of a canonical `published` timestamp.
pub fn freshness_points(published: &str, now: DateTime<Utc>) -> u8 {
    match time::age_in_hours(published, now) {
        Some(hours) if hours < 6.0 => FRESHNESS_CAP,
        Some(hours) if hours < 24.0 => 25,
        Some(hours) if hours < 72.0 => 15,
        Some(hours) if hours < 168.0 => 5,
        Some(_) => STALE_FRESHNESS,
        None => {
            warn!("Unparseable published date '{}', using fallback freshness", published);
            STALE_FRESHNESS
        }
    }
}

/// Points for description length, in characters.
pub fn richness_points(description: &str) -> u8 {
    match description.chars().count() {
        len if len > 500 => RICHNESS_CAP,
        len if len > 200 => 7,
        len if len > 100 => 4,
        _ => 2,
    }
}
