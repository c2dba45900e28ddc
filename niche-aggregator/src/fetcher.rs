use crate::parser::FeedParser;
use crate::traits::FeedSource;
use crate::types::{AggregatorError, FetchConfig, RawFeed, Result};
use crate::utils;
use async_trait::async_trait;
use reqwest::{redirect, Client};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Fetches feeds over HTTP and decodes them with [`FeedParser`].
pub struct HttpFeedFetcher {
    client: Client,
    config: FetchConfig,
    parser: FeedParser,
}

impl HttpFeedFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let redirect_policy = if config.follow_redirects {
            redirect::Policy::limited(config.max_redirects)
        } else {
            redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(redirect_policy)
            .build()?;

        Ok(Self {
            client,
            config,
            parser: FeedParser::new(),
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn fetch_body(&self, url: &str) -> Result<Vec<u8>> {
        if !utils::url::is_valid_feed_url(url) {
            // Surfaces url::ParseError for garbage, General for non-http schemes.
            url::Url::parse(url)?;
            return Err(AggregatorError::General(format!(
                "Unsupported feed URL scheme: {}",
                url
            )));
        }

        let start_time = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(AggregatorError::General(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let max_bytes = self.config.max_feed_size_mb * 1024 * 1024;
        if let Some(content_length) = response.content_length() {
            if content_length as usize > max_bytes {
                return Err(AggregatorError::FeedTooLarge {
                    size_mb: content_length as usize / (1024 * 1024),
                });
            }
        }

        let body = response.bytes().await?;
        if body.len() > max_bytes {
            return Err(AggregatorError::FeedTooLarge {
                size_mb: body.len() / (1024 * 1024),
            });
        }

        debug!(
            "Fetched {} ({} bytes in {}ms)",
            url,
            body.len(),
            start_time.elapsed().as_millis()
        );

        Ok(body.to_vec())
    }
}

#[async_trait]
impl FeedSource for HttpFeedFetcher {
    fn source_name(&self) -> String {
        format!("http ({})", self.config.user_agent)
    }

    async fn fetch(&self, url: &str, limit: usize) -> Result<RawFeed> {
        let body = self.fetch_body(url).await?;

        if !FeedParser::is_valid_feed_content(&String::from_utf8_lossy(&body)) {
            return Err(AggregatorError::Parse(format!(
                "Response from {} does not look like a feed",
                url
            )));
        }

        let feed = self.parser.parse_feed(&body, limit)?;
        info!("Successfully fetched feed: {} ({} entries)", url, feed.entries.len());
        Ok(feed)
    }
}
