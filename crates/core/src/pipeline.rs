use crate::domain::layout::FIELD_LAYOUT_VERSION;
use crate::domain::recommendation::Feed;
use crate::domain::stats::{aggregate, Stats};
use crate::ingest::error::IngestFailure;
use crate::ingest::feed::{normalize_feed, parse_payload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What one refresh hands to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub generated_at: DateTime<Utc>,
    pub layout_version: u16,
    pub feed: Feed,
    pub stats: Stats,
}

impl Snapshot {
    pub fn from_feed(feed: Feed, generated_at: DateTime<Utc>) -> Self {
        let stats = aggregate(&feed);
        Self {
            generated_at,
            layout_version: FIELD_LAYOUT_VERSION,
            feed,
            stats,
        }
    }
}

pub fn build_snapshot(payload: &Value, generated_at: DateTime<Utc>) -> Result<Snapshot, IngestFailure> {
    let feed = normalize_feed(payload)?;
    Ok(Snapshot::from_feed(feed, generated_at))
}

pub fn build_snapshot_from_text(
    text: &str,
    generated_at: DateTime<Utc>,
) -> Result<Snapshot, IngestFailure> {
    let feed = parse_payload(text)?;
    Ok(Snapshot::from_feed(feed, generated_at))
}
