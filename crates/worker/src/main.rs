use anyhow::Context;
use clap::Parser;
use market360_core::ingest::provider::{FeedProvider, FileFeedProvider, HttpFeedProvider};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod refresh;
mod render;

#[derive(Debug, Parser)]
#[command(name = "market360_worker")]
struct Args {
    /// Refresh once and exit; exits non-zero when the feed fails.
    #[arg(long)]
    once: bool,

    /// Read the payload from a JSON file instead of the feed URL.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Seconds between refreshes. Defaults to MARKET360_REFRESH_SECS or 300.
    #[arg(long)]
    interval_secs: Option<u64>,

    #[arg(long, value_enum, default_value_t = render::Output::Text)]
    output: render::Output,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = market360_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let provider: Box<dyn FeedProvider> = match &args.input {
        Some(path) => Box::new(FileFeedProvider::new(path)),
        None => Box::new(HttpFeedProvider::from_settings(&settings)?),
    };

    let opts = refresh::RefreshOptions {
        interval: Duration::from_secs(args.interval_secs.unwrap_or(settings.refresh_secs)),
        output: args.output,
        display_offset: settings.display_offset()?,
    };
    anyhow::ensure!(
        args.once || !opts.interval.is_zero(),
        "refresh interval must be at least one second"
    );

    tracing::info!(
        provider = provider.provider_name(),
        once = args.once,
        interval_secs = opts.interval.as_secs(),
        "market360 worker starting"
    );

    if args.once {
        let outcome = refresh::refresh_once(provider.as_ref()).await;
        refresh::publish(&outcome, &opts)?;
        return outcome
            .map(|_| ())
            .context("feed refresh failed");
    }

    refresh::run(provider.as_ref(), &opts).await
}

fn init_sentry(settings: &market360_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
