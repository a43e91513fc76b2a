use chrono::FixedOffset;
use clap::Parser;
use rss_alerts::{
    default_triggers, poll_loop, run_cycle, ConsolePresenter, FetchConfig, OutputFormat, PollConfig,
    RssFeedSource, ShownStories, TriggerConfig, DEFAULT_FEED_URL,
};
use std::path::PathBuf;
use tracing::{error, info};

/// Poll an RSS feed and print the stories that fire a trigger.
#[derive(Debug, Parser)]
#[command(name = "rss-alerts", version)]
struct Cli {
    /// Feed to poll
    #[arg(long, env = "RSS_ALERTS_FEED_URL", default_value = DEFAULT_FEED_URL)]
    feed_url: String,

    /// Trigger file (`name,KIND,args` lines plus `ADD,...`); defaults to TITLE/DESCRIPTION "Trump"
    #[arg(long, env = "RSS_ALERTS_TRIGGERS")]
    triggers: Option<PathBuf>,

    /// Seconds between polls
    #[arg(long, env = "RSS_ALERTS_INTERVAL_SECS", default_value_t = 60)]
    interval_secs: u64,

    /// Offset used for times written without a zone, e.g. `+00:00` or `-05:00`
    #[arg(long, env = "RSS_ALERTS_REFERENCE_OFFSET", default_value = "+00:00")]
    reference_offset: FixedOffset,

    /// Poll once and exit
    #[arg(long)]
    once: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    info!("Starting RSS alerts for {}", cli.feed_url);

    let config = PollConfig {
        feed_url: cli.feed_url,
        interval_seconds: cli.interval_secs,
        reference_offset: cli.reference_offset,
        fetch: FetchConfig::default(),
    };

    let triggers = match &cli.triggers {
        Some(path) => TriggerConfig::new(config.reference_offset).load(path).map_err(|e| {
            error!("Failed to load triggers from {}: {}", path.display(), e);
            e
        })?,
        None => default_triggers()?,
    };
    if triggers.is_empty() {
        anyhow::bail!("trigger list is empty; add at least one `ADD,...` line");
    }
    info!("Using {} triggers", triggers.len());

    let mut source = RssFeedSource::from_config(&config)?;
    let mut shown = ShownStories::new();
    let mut presenter = ConsolePresenter::stdout(cli.format);

    if cli.once {
        let report = run_cycle(&mut source, &triggers, &mut shown, &mut presenter).await?;
        info!("Presented {} of {} pulled stories", report.presented, report.pulled);
    } else {
        poll_loop(&mut source, &triggers, &mut shown, &mut presenter).await?;
    }

    info!("RSS alerts finished");
    Ok(())
}
