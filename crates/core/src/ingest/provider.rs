use crate::config::Settings;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRIES: u32 = 3;
// Keeps the `1 << (attempt - 1)` backoff well inside u64.
const MAX_RETRIES: u32 = 10;

/// Source of the raw feed body. Parsing is left to the caller so that a body
/// that arrives but is not JSON stays distinguishable from a failed fetch.
#[async_trait::async_trait]
pub trait FeedProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_raw(&self) -> Result<String>;
}

/// The spreadsheet web app, queried as `GET <feed_url>?action=<action>`.
#[derive(Debug, Clone)]
pub struct HttpFeedProvider {
    http: reqwest::Client,
    feed_url: String,
    action: String,
    retries: u32,
}

impl HttpFeedProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let feed_url = settings.require_feed_url()?;

        let timeout_secs = std::env::var("MARKET360_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("MARKET360_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES);

        Self::new(
            feed_url,
            &settings.feed_action,
            Duration::from_secs(timeout_secs),
            retries,
        )
    }

    /// `retries` is the total number of attempts, clamped to `1..=10`.
    pub fn new(feed_url: &str, action: &str, timeout: Duration, retries: u32) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build feed http client")?;

        Ok(Self {
            http,
            feed_url: feed_url.to_string(),
            action: action.to_string(),
            retries: retries.clamp(1, MAX_RETRIES),
        })
    }

    async fn fetch_once(&self) -> Result<String> {
        let res = self
            .http
            .get(&self.feed_url)
            .query(&[("action", self.action.as_str())])
            .send()
            .await
            .context("feed request failed")?;

        let status = res.status();
        let text = res.text().await.context("failed to read feed response")?;

        if !status.is_success() {
            anyhow::bail!("feed HTTP {status}: {text}");
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl FeedProvider for HttpFeedProvider {
    fn provider_name(&self) -> &'static str {
        "apps_script_http"
    }

    async fn fetch_raw(&self) -> Result<String> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once().await {
                Ok(text) => return Ok(text),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_secs(1 << (attempt - 1));
                    tracing::warn!(attempt, ?backoff, error = %err, "feed fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

/// Reads a saved payload from disk.
#[derive(Debug, Clone)]
pub struct FileFeedProvider {
    path: PathBuf,
}

impl FileFeedProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl FeedProvider for FileFeedProvider {
    fn provider_name(&self) -> &'static str {
        "file"
    }

    async fn fetch_raw(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read feed file {}", self.path.display()))
    }
}
