pub mod defs;

pub use defs::{Published, Story, StoryPresenter};
