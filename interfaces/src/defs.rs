use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Publication timestamp of a story as the feed reported it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Published {
    /// The source carried a numeric offset or a zone abbreviation we know.
    Zoned(DateTime<FixedOffset>),
    /// Wall-clock time with no zone information.
    Floating(NaiveDateTime),
}

impl Published {
    /// Pin the timestamp to an instant. Floating times are read as wall-clock
    /// time at `assume_offset`; zoned times ignore it.
    pub fn to_utc(&self, assume_offset: FixedOffset) -> DateTime<Utc> {
        match self {
            Published::Zoned(dt) => dt.with_timezone(&Utc),
            // Local wall-clock minus the offset is the UTC wall-clock.
            Published::Floating(naive) => Utc.from_utc_datetime(&(*naive - assume_offset)),
        }
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, Published::Floating(_))
    }
}

impl From<DateTime<Utc>> for Published {
    fn from(dt: DateTime<Utc>) -> Self {
        Published::Zoned(dt.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for Published {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Published::Zoned(dt)
    }
}

impl From<NaiveDateTime> for Published {
    fn from(naive: NaiveDateTime) -> Self {
        Published::Floating(naive)
    }
}

/// A single news story handed over by the feed collaborator.
///
/// `guid` and `link` are opaque to the trigger engine; `guid` exists for
/// "already shown" bookkeeping downstream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub guid: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub published: Option<Published>,
}

impl Story {
    pub fn new(
        guid: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
        published: impl Into<Published>,
    ) -> Self {
        Self {
            guid: guid.into(),
            title: title.into(),
            description: description.into(),
            link: link.into(),
            published: Some(published.into()),
        }
    }
}

// Object style note:
// Presenters sit at the very end of a poll cycle. They receive stories that
// already passed the trigger list and the shown-set, in feed order, and they
// must not reach back into the engine.

pub trait StoryPresenter {
    fn present(&mut self, story: &Story) -> std::io::Result<()>;

    /// Called once after every cycle that presented at least one story.
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
