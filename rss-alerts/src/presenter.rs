use crate::types::{Story, StoryPresenter};
use std::collections::HashSet;
use std::io::{self, Write};

const TITLE_RULE: &str = "---------------------------------------------------------------";
const STORY_RULE: &str = "*********************************************************************";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Title, rule, description blocks
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Writes matched stories to any `io::Write`.
pub struct ConsolePresenter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl ConsolePresenter<io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(io::stdout(), format)
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> StoryPresenter for ConsolePresenter<W> {
    fn present(&mut self, story: &Story) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "{}", story.title)?;
                writeln!(self.out, "{}", TITLE_RULE)?;
                writeln!(self.out, "{}", story.description)?;
                if !story.link.is_empty() {
                    writeln!(self.out, "{}", story.link)?;
                }
                writeln!(self.out, "{}", STORY_RULE)
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, story)?;
                writeln!(self.out)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Guids already handed to a presenter. Owned by the caller of the poll loop.
#[derive(Debug, Default, Clone)]
pub struct ShownStories {
    guids: HashSet<String>,
}

impl ShownStories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `guid`; returns false when it was already shown.
    pub fn mark_shown(&mut self, guid: &str) -> bool {
        if self.guids.contains(guid) {
            return false;
        }
        self.guids.insert(guid.to_string())
    }

    pub fn contains(&self, guid: &str) -> bool {
        self.guids.contains(guid)
    }

    pub fn len(&self) -> usize {
        self.guids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guids.is_empty()
    }
}
