use crate::trigger::Evaluate;
use crate::types::{Result, Story};
use tracing::debug;

/// Keep the stories for which at least one trigger fires, in input order.
///
/// An empty trigger list keeps nothing. The first evaluation error aborts the
/// whole batch; no partially filtered result is returned.
pub fn filter_stories<T: Evaluate>(stories: &[Story], triggers: &[T]) -> Result<Vec<Story>> {
    Ok(filter_story_refs(stories, triggers)?
        .into_iter()
        .cloned()
        .collect())
}

/// Borrowing variant of [`filter_stories`].
pub fn filter_story_refs<'a, T: Evaluate>(stories: &'a [Story], triggers: &[T]) -> Result<Vec<&'a Story>> {
    let mut kept = Vec::new();

    for story in stories {
        if any_fires(story, triggers)? {
            kept.push(story);
        }
    }

    debug!("Trigger list kept {} of {} stories", kept.len(), stories.len());
    Ok(kept)
}

fn any_fires<T: Evaluate>(story: &Story, triggers: &[T]) -> Result<bool> {
    for trigger in triggers {
        if trigger.evaluate(story)? {
            return Ok(true);
        }
    }
    Ok(false)
}
