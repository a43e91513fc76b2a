use crate::filter::filter_story_refs;
use crate::presenter::ShownStories;
use crate::traits::StorySource;
use crate::trigger::Evaluate;
use crate::types::{CycleReport, Result, StoryPresenter};
use std::future::Future;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// One poll cycle: pull, filter through the trigger list, drop stories
/// already shown, present the rest in feed order.
///
/// A story is only marked as shown once the presenter accepted it, so a
/// presenter failure leaves it eligible for the next cycle.
pub async fn run_cycle<S, T, P>(
    source: &mut S,
    triggers: &[T],
    shown: &mut ShownStories,
    presenter: &mut P,
) -> Result<CycleReport>
where
    S: StorySource + ?Sized,
    T: Evaluate,
    P: StoryPresenter + ?Sized,
{
    let stories = source.pull().await?;
    let matched = filter_story_refs(&stories, triggers)?;

    let mut report = CycleReport {
        pulled: stories.len(),
        matched: matched.len(),
        presented: 0,
    };

    for story in matched {
        if shown.contains(&story.guid) {
            debug!("Story {} already shown", story.guid);
            continue;
        }
        presenter.present(story)?;
        shown.mark_shown(&story.guid);
        report.presented += 1;
    }

    if report.presented > 0 {
        presenter.flush()?;
    }

    info!(
        "Cycle for {}: pulled {}, matched {}, presented {}",
        source.source_id(),
        report.pulled,
        report.matched,
        report.presented
    );
    Ok(report)
}

/// Poll `source` on its interval until Ctrl-C. A failing cycle is logged and
/// the loop carries on with the next tick.
pub async fn poll_loop<S, T, P>(
    source: &mut S,
    triggers: &[T],
    shown: &mut ShownStories,
    presenter: &mut P,
) -> Result<()>
where
    S: StorySource + ?Sized,
    T: Evaluate,
    P: StoryPresenter + ?Sized,
{
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
        }
    };
    poll_until(source, triggers, shown, presenter, ctrl_c).await
}

/// Poll `source` on its interval until `shutdown` completes. Shutdown also
/// interrupts a cycle that is still in flight.
pub async fn poll_until<S, T, P, F>(
    source: &mut S,
    triggers: &[T],
    shown: &mut ShownStories,
    presenter: &mut P,
    shutdown: F,
) -> Result<()>
where
    S: StorySource + ?Sized,
    T: Evaluate,
    P: StoryPresenter + ?Sized,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut ticker = interval(source.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Polling every {:?}", source.poll_interval());

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                tokio::select! {
                    _ = &mut shutdown => break,
                    result = run_cycle(source, triggers, shown, presenter) => {
                        if let Err(e) = result {
                            error!("Poll cycle failed: {}", e);
                        }
                    }
                }
            }
        }
    }

    info!("Shutting down after {} stories shown", shown.len());
    Ok(())
}
