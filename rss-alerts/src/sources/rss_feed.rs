use crate::traits::StorySource;
use crate::types::{AlertError, FetchConfig, PollConfig, Result, Story};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

/// RSS/Atom feed reachable over HTTP.
pub struct RssFeedSource {
    pub feed_id: Uuid,
    pub url: String,
    fetcher: Fetcher,
    parser: FeedParser,
    last_fetch: Option<DateTime<Utc>>,
    last_etag: Option<String>,
    last_modified: Option<String>,
    poll_interval: Duration,
}

impl RssFeedSource {
    pub fn new(url: String, fetch_config: FetchConfig, parser: FeedParser, poll_interval: Duration) -> Result<Self> {
        let parsed = Url::parse(&url)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AlertError::General(format!("Unsupported feed URL scheme: {}", parsed.scheme())));
        }

        Ok(Self {
            feed_id: Uuid::new_v4(),
            url,
            fetcher: Fetcher::new(fetch_config)?,
            parser,
            last_fetch: None,
            last_etag: None,
            last_modified: None,
            poll_interval,
        })
    }

    pub fn from_config(config: &PollConfig) -> Result<Self> {
        Self::new(
            config.feed_url.clone(),
            config.fetch.clone(),
            FeedParser::new(config.reference_offset),
            Duration::from_secs(config.interval_seconds),
        )
    }

    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        self.last_fetch
    }
}

#[async_trait]
impl StorySource for RssFeedSource {
    fn source_id(&self) -> String {
        format!("rss_{}", self.feed_id)
    }

    async fn pull(&mut self) -> Result<Vec<Story>> {
        info!("Pulling RSS feed: {}", self.url);

        let fetch_result = self
            .fetcher
            .fetch_feed(
                self.feed_id,
                &self.url,
                self.last_etag.as_deref(),
                self.last_modified.as_deref(),
            )
            .await?;

        if !fetch_result.success {
            let error_msg = fetch_result.error.unwrap_or_else(|| "Fetch failed".to_string());
            error!("Failed to fetch RSS feed {}: {}", self.url, error_msg);
            return Err(AlertError::General(error_msg));
        }

        // Update last fetch metadata
        self.last_fetch = Some(fetch_result.fetch_time);
        self.last_etag = fetch_result.etag.clone();
        self.last_modified = fetch_result.last_modified.clone();

        let content = match fetch_result.content {
            Some(content) => content,
            None => {
                info!("RSS feed {} not modified since last pull", self.url);
                return Ok(Vec::new());
            }
        };

        if !FeedParser::is_valid_feed_content(&content) {
            warn!("Content from {} does not look like RSS/Atom", self.url);
        }

        let stories = self.parser.parse_stories(&content)?;
        info!("Successfully pulled {} stories from RSS feed {}", stories.len(), self.url);
        Ok(stories)
    }

    fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}
