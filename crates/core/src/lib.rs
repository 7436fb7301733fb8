pub mod display;
pub mod domain;
pub mod ingest;
pub mod pipeline;

pub mod config {
    use anyhow::Context;
    use chrono::FixedOffset;

    pub const DEFAULT_FEED_ACTION: &str = "getAllStockData";
    pub const DEFAULT_REFRESH_SECS: u64 = 300;
    pub const DEFAULT_DISPLAY_UTC_OFFSET_MINUTES: i32 = 330;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub feed_url: Option<String>,
        pub feed_action: String,
        pub refresh_secs: u64,
        pub display_utc_offset_minutes: i32,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                feed_url: None,
                feed_action: DEFAULT_FEED_ACTION.to_string(),
                refresh_secs: DEFAULT_REFRESH_SECS,
                display_utc_offset_minutes: DEFAULT_DISPLAY_UTC_OFFSET_MINUTES,
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let mut out = Self {
                feed_url: non_empty_var("MARKET360_FEED_URL"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                ..Self::default()
            };

            if let Some(action) = non_empty_var("MARKET360_FEED_ACTION") {
                out.feed_action = action;
            }

            if let Some(s) = non_empty_var("MARKET360_REFRESH_SECS") {
                out.refresh_secs = s
                    .parse::<u64>()
                    .with_context(|| format!("MARKET360_REFRESH_SECS must be seconds (got {s})"))?;
            }

            if let Some(s) = non_empty_var("MARKET360_DISPLAY_UTC_OFFSET_MINUTES") {
                out.display_utc_offset_minutes = s.parse::<i32>().with_context(|| {
                    format!("MARKET360_DISPLAY_UTC_OFFSET_MINUTES must be minutes (got {s})")
                })?;
            }

            Ok(out)
        }

        pub fn require_feed_url(&self) -> anyhow::Result<&str> {
            self.feed_url
                .as_deref()
                .context("MARKET360_FEED_URL is required")
        }

        pub fn display_offset(&self) -> anyhow::Result<FixedOffset> {
            let minutes = self.display_utc_offset_minutes;
            minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .with_context(|| format!("display UTC offset out of range: {minutes} minutes"))
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

}
