use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
// Use the interfaces crate for core types
pub use interfaces::defs::{Published, Story, StoryPresenter};

pub const DEFAULT_FEED_URL: &str = "http://news.google.com/news?output=rss";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_feed_size_mb: usize,
    pub follow_redirects: bool,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "RSS-Alerts/1.0".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            retry_delay_seconds: 5,
            max_feed_size_mb: 10,
            follow_redirects: true,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub feed_url: String,
    pub interval_seconds: u64,
    /// Offset used to anchor reference times and story timestamps that carry no zone.
    pub reference_offset: FixedOffset,
    pub fetch: FetchConfig,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            interval_seconds: 60,
            reference_offset: Utc.fix(),
            fetch: FetchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResult {
    pub feed_id: Uuid,
    pub success: bool,
    pub error: Option<String>,
    pub fetch_time: DateTime<Utc>,
    pub response_time_ms: u64,
    pub http_status: Option<u16>,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    pub content: Option<String>, // RSS/XML content
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    pub pulled: usize,
    pub matched: usize,
    pub presented: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("Malformed story {guid}: {reason}")]
    MalformedStory { guid: String, reason: String },

    #[error("Inconsistent timezone awareness: {0}")]
    InconsistentTimezone(String),

    #[error("Trigger configuration error at line {line}: {message}")]
    Configuration { line: usize, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed size exceeds limit: {size_mb}MB")]
    FeedTooLarge { size_mb: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

impl AlertError {
    /// Configuration error raised outside of a trigger file (line 0).
    pub fn config(message: impl Into<String>) -> Self {
        AlertError::Configuration {
            line: 0,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AlertError>;
