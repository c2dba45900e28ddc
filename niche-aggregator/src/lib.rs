pub mod types;
pub mod traits;
pub mod utils;
pub mod parser;
pub mod fetcher;
pub mod article;
pub mod scoring;
pub mod config;
pub mod aggregator;
pub mod output;
pub mod pipeline;

pub use types::*;
pub use traits::FeedSource;
pub use parser::FeedParser;
pub use fetcher::HttpFeedFetcher;
pub use article::{article_id, ArticleBuilder, EntryFields};
pub use scoring::{KeywordTiers, RelevanceScorer, ScoreBreakdown, ScoringConfig};
pub use config::{NicheConfig, SourcesConfig, Subsection};
pub use aggregator::{apply_priority, Candidate, NicheAggregator};
pub use pipeline::{NicheOutcome, Pipeline, RunConfig, RunSummary};
