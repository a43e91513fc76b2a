pub mod types;
pub mod normalize;
pub mod pubdate;
pub mod trigger;
pub mod filter;
pub mod trigger_config;
pub mod fetcher;
pub mod parser;
pub mod traits;
pub mod sources;
pub mod presenter;
pub mod poller;

pub use types::*;
pub use normalize::normalize_text;
pub use trigger::{Direction, Evaluate, Trigger};
pub use filter::{filter_stories, filter_story_refs};
pub use trigger_config::{default_triggers, TriggerConfig};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use traits::StorySource;
pub use sources::RssFeedSource;
pub use presenter::{ConsolePresenter, OutputFormat, ShownStories};
pub use poller::{poll_loop, poll_until, run_cycle};
