use crate::types::{Result, Story};
use async_trait::async_trait;
use std::time::Duration;

/// Trait for pulling stories from a feed source.
#[async_trait]
pub trait StorySource: Send + Sync {
    /// Unique identifier for this source
    fn source_id(&self) -> String;

    /// Fetch the stories currently published by the source.
    /// An unchanged feed returns an empty list.
    async fn pull(&mut self) -> Result<Vec<Story>>;

    /// Recommended delay between two pulls
    fn poll_interval(&self) -> Duration;
}
