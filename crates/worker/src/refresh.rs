use crate::render::{self, Output};
use chrono::{FixedOffset, Utc};
use market360_core::ingest::error::IngestFailure;
use market360_core::ingest::provider::FeedProvider;
use market360_core::pipeline::{build_snapshot_from_text, Snapshot};
use std::future::Future;
use std::io::Write;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone)]
pub struct RefreshOptions {
    pub interval: Duration,
    pub output: Output,
    pub display_offset: FixedOffset,
}

/// One fetch + normalize + aggregate. Periodic and manual runs both go
/// through here.
pub async fn refresh_once(provider: &dyn FeedProvider) -> Result<Snapshot, IngestFailure> {
    let body = provider
        .fetch_raw()
        .await
        .map_err(|err| IngestFailure::Transport {
            detail: format!("{err:#}"),
        })?;

    build_snapshot_from_text(&body, Utc::now())
}

/// Logs the outcome and writes the rendered view to stdout.
pub fn publish(outcome: &Result<Snapshot, IngestFailure>, opts: &RefreshOptions) -> anyhow::Result<()> {
    match outcome {
        Ok(snapshot) => {
            let stats = &snapshot.stats;
            tracing::info!(
                total = stats.total_count,
                active = stats.active_count,
                win_rate = stats.win_rate,
                traders = stats.distinct_trader_count,
                "feed refreshed"
            );
        }
        Err(failure) => {
            sentry_anyhow::capture_anyhow(&anyhow::Error::new(failure.clone()));
            tracing::error!(stage = failure.stage(), error = %failure, "feed refresh failed");
        }
    }

    let view = match opts.output {
        Output::Text => render::render_text(outcome, &opts.display_offset),
        Output::Json => render::render_json(outcome)?,
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{view}")?;
    stdout.flush()?;
    Ok(())
}

/// Refreshes immediately, then every `interval` until Ctrl-C. A failed cycle
/// is reported and the loop carries on.
pub async fn run(provider: &dyn FeedProvider, opts: &RefreshOptions) -> anyhow::Result<()> {
    run_until(provider, opts, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// [`run`] with an explicit shutdown signal. The signal is polled for the
/// whole lifetime of the loop, including while a refresh is in flight; an
/// interrupted refresh is dropped without publishing.
pub async fn run_until<F>(
    provider: &dyn FeedProvider,
    opts: &RefreshOptions,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut ticker = tokio::time::interval(opts.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("shutdown requested");
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            outcome = refresh_once(provider) => outcome,
            _ = &mut shutdown => {
                tracing::info!("shutdown requested during refresh");
                return Ok(());
            }
        };
        publish(&outcome, opts)?;
    }
}
