use anyhow::Context;
use clap::Parser;
use niche_aggregator::{
    AggregationConfig, FetchConfig, HttpFeedFetcher, Niche, NicheAggregator, Pipeline,
    RelevanceScorer, RunConfig, ScoringConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Fetch the configured feeds, score and rank them per niche, write JSON files.
#[derive(Debug, Parser)]
#[command(name = "niche-aggregator", version)]
struct Cli {
    /// Sources document, keyed by niche
    #[arg(long, default_value = "feeds/sources.json")]
    sources: PathBuf,

    /// Directory receiving `<niche>_news.json` files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Only process these niches (repeatable); defaults to all
    #[arg(long = "niche", value_name = "NICHE")]
    niches: Vec<Niche>,

    /// Feeds of one niche fetched concurrently
    #[arg(long, default_value_t = 4)]
    max_concurrent_fetches: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_seconds: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let run_config = RunConfig {
        sources_path: cli.sources,
        data_dir: cli.data_dir,
        niches: if cli.niches.is_empty() {
            Niche::ALL.to_vec()
        } else {
            cli.niches
        },
    };

    let fetch_config = FetchConfig {
        timeout_seconds: cli.timeout_seconds,
        ..FetchConfig::default()
    };
    let aggregation_config = AggregationConfig {
        max_concurrent_fetches: cli.max_concurrent_fetches,
        ..AggregationConfig::default()
    };

    let fetcher = HttpFeedFetcher::new(fetch_config).context("failed to build HTTP client")?;
    let aggregator = NicheAggregator::new(
        Arc::new(fetcher),
        RelevanceScorer::new(ScoringConfig::default()),
        aggregation_config,
    );

    let pipeline = Pipeline::new(run_config, aggregator);
    match pipeline.run().await {
        Ok(summary) => {
            for outcome in &summary.written {
                info!(
                    "{}: {} articles (max score {}) -> {}",
                    outcome.niche,
                    outcome.total_articles,
                    outcome.max_score,
                    outcome.path.display()
                );
            }
            Ok(())
        }
        Err(e) => {
            error!("Run aborted: {}", e);
            Err(e).context("feed aggregation failed")
        }
    }
}
