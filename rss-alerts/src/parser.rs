use crate::normalize::strip_html;
use crate::pubdate::parse_pubdate;
use crate::types::{AlertError, Published, Result, Story};
use chrono::{FixedOffset, Offset, Utc};
use feed_rs::parser;
use tracing::{debug, info, warn};

/// Turns RSS/Atom documents into [`Story`] values ready for the trigger engine.
pub struct FeedParser {
    reference_offset: FixedOffset,
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl FeedParser {
    /// `reference_offset` anchors publication dates whose zone we cannot resolve.
    pub fn new(reference_offset: FixedOffset) -> Self {
        Self { reference_offset }
    }

    pub fn parse_stories(&self, content: &str) -> Result<Vec<Story>> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let offset = self.reference_offset;
        let feed = parser::Builder::new()
            .timestamp_parser(move |text| parse_pubdate(text).map(|published| published.to_utc(offset)))
            .build()
            .parse(content.as_bytes())
            .map_err(|e| AlertError::Parse(format!("Failed to parse feed: {}", e)))?;

        let mut stories = Vec::with_capacity(feed.entries.len());
        for entry in feed.entries {
            if let Some(story) = self.parse_entry(entry) {
                stories.push(story);
            }
        }

        info!("Parsed feed with {} stories", stories.len());
        Ok(stories)
    }

    fn parse_entry(&self, entry: feed_rs::model::Entry) -> Option<Story> {
        let title = entry.title.map(|t| strip_html(&t.content)).unwrap_or_default();
        let link = entry.links.first().map(|l| l.href.clone()).unwrap_or_default();

        let guid = if !entry.id.is_empty() {
            entry.id.clone()
        } else if !link.is_empty() {
            link.clone()
        } else {
            warn!("Skipping entry {:?} with neither guid nor link", title);
            return None;
        };

        // Stories without a timestamp never reach the trigger engine.
        let published = match entry.published.or(entry.updated) {
            Some(dt) => Published::from(dt),
            None => {
                warn!("Skipping entry {} without a parseable publication date", guid);
                return None;
            }
        };

        let description = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body))
            .map(|html| strip_html(&html))
            .unwrap_or_default();

        Some(Story {
            guid,
            title,
            description,
            link,
            published: Some(published),
        })
    }

    pub fn is_valid_feed_content(content: &str) -> bool {
        let content_lower = content.to_lowercase();

        content_lower.contains("<rss")
            || content_lower.contains("<feed")
            || content_lower.contains("<rdf:rdf")
            || content_lower.contains("<channel")
    }
}
