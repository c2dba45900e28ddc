use crate::aggregator::NicheAggregator;
use crate::config::SourcesConfig;
use crate::output;
use crate::types::{Niche, NicheResult, Result};
use chrono::Utc;
use std::path::PathBuf;
use tracing::{info, warn};

const BANNER_WIDTH: usize = 60;

/// Where a run reads its sources and writes its output.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sources_path: PathBuf,
    pub data_dir: PathBuf,
    /// Niches to process; always run in [`Niche::ALL`] order.
    pub niches: Vec<Niche>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sources_path: PathBuf::from("feeds/sources.json"),
            data_dir: PathBuf::from("data"),
            niches: Niche::ALL.to_vec(),
        }
    }
}

/// A niche whose output was written.
#[derive(Debug, Clone, PartialEq)]
pub struct NicheOutcome {
    pub niche: Niche,
    pub path: PathBuf,
    pub total_articles: usize,
    pub max_score: u8,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub written: Vec<NicheOutcome>,
    /// Niches without any configured source.
    pub skipped: Vec<Niche>,
}

/// One full run: load sources, aggregate each niche, write its output.
pub struct Pipeline {
    run_config: RunConfig,
    aggregator: NicheAggregator,
}

impl Pipeline {
    pub fn new(run_config: RunConfig, aggregator: NicheAggregator) -> Self {
        Self {
            run_config,
            aggregator,
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        info!("{}", "=".repeat(BANNER_WIDTH));
        info!("Niche Aggregator - RSS feed aggregation run");
        info!("{}", "=".repeat(BANNER_WIDTH));

        let sources_config = SourcesConfig::load(&self.run_config.sources_path).await?;
        info!("Loaded sources from {}", self.run_config.sources_path.display());

        let summary = self.run_with(&sources_config).await?;

        info!("{}", "=".repeat(BANNER_WIDTH));
        info!(
            "Done: {} niches written, {} skipped",
            summary.written.len(),
            summary.skipped.len()
        );
        info!("{}", "=".repeat(BANNER_WIDTH));
        Ok(summary)
    }

    /// Process the selected niches against an already loaded config.
    pub async fn run_with(&self, sources_config: &SourcesConfig) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        let selected = Niche::ALL
            .into_iter()
            .filter(|niche| self.run_config.niches.contains(niche));

        for niche in selected {
            let sources = sources_config.resolve_sources(niche);
            if sources.is_empty() {
                warn!("No sources found for {}", niche);
                summary.skipped.push(niche);
                continue;
            }

            let articles = self.aggregator.aggregate(niche, &sources).await;
            let result = NicheResult::new(articles, Utc::now());
            let path = output::write_niche_result(&self.run_config.data_dir, niche, &result).await?;

            summary.written.push(NicheOutcome {
                niche,
                path,
                total_articles: result.total_articles,
                max_score: result.articles.first().map(|a| a.score).unwrap_or(0),
            });
        }

        Ok(summary)
    }
}
