use crate::domain::recommendation::Feed;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_count: usize,
    /// Active recommendations across all buckets.
    pub active_count: usize,
    /// Percentage of P&L samples strictly above zero, 0 without samples.
    pub win_rate: u32,
    pub distinct_trader_count: usize,
    /// Records whose P&L was reported as a number.
    pub pnl_sample_count: usize,
}

/// Recomputes every figure from scratch over all buckets.
pub fn aggregate(feed: &Feed) -> Stats {
    let mut active_count = 0;
    let mut samples = 0;
    let mut wins = 0;
    let mut traders = HashSet::<&str>::new();

    for (_, rec) in feed.iter() {
        if rec.is_active() {
            active_count += 1;
        }

        if let Some(pnl) = rec.reported.profit_loss_percent {
            samples += 1;
            if pnl > 0.0 {
                wins += 1;
            }
        }

        if let Some(trader) = rec.reported.trader.as_deref() {
            traders.insert(trader);
        }
    }

    Stats {
        total_count: feed.len(),
        active_count,
        win_rate: win_rate(wins, samples),
        distinct_trader_count: traders.len(),
        pnl_sample_count: samples,
    }
}

pub fn win_rate(wins: usize, samples: usize) -> u32 {
    if samples == 0 {
        return 0;
    }
    (100.0 * wins as f64 / samples as f64).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recommendation::normalize;
    use serde_json::{json, Value};

    fn row(status: Value, trader: Value, pnl: Value) -> Value {
        json!(["2024-01-15", "SYM", "Co", 1, 2, 3, status, trader, "Sector", 4, pnl])
    }

    #[test]
    fn empty_feed_yields_zeroes() {
        let stats = aggregate(&Feed::default());
        assert_eq!(stats, Stats::default());
        assert_eq!(stats.win_rate, 0);
    }

    #[test]
    fn unparseable_pnl_is_excluded_from_win_rate_samples() {
        let mut feed = Feed::default();
        for pnl in [json!(5), json!(-2), json!(0), json!("bad")] {
            feed.intraday.push(normalize(&row(json!("Active"), json!("A"), pnl)));
        }

        let stats = aggregate(&feed);
        assert_eq!(stats.pnl_sample_count, 3);
        assert_eq!(stats.win_rate, 33);
    }

    #[test]
    fn win_rate_samples_span_all_buckets() {
        let mut feed = Feed::default();
        feed.intraday.push(normalize(&row(json!(""), json!(""), json!("1.5"))));
        feed.longterm.push(normalize(&row(json!(""), json!(""), json!(2))));
        feed.shortterm.push(normalize(&row(json!(""), json!(""), json!(null))));

        let stats = aggregate(&feed);
        assert_eq!(stats.pnl_sample_count, 2);
        assert_eq!(stats.win_rate, 100);
    }

    #[test]
    fn distinct_traders_skip_missing_values() {
        let mut feed = Feed::default();
        for trader in [json!("Alice"), json!(""), json!("Alice"), json!(null), json!("Bob")] {
            feed.shortterm.push(normalize(&row(json!("Active"), trader, json!(1))));
        }

        assert_eq!(aggregate(&feed).distinct_trader_count, 2);
    }

    #[test]
    fn trader_identity_is_case_sensitive_and_unknown_is_a_name() {
        let mut feed = Feed::default();
        for trader in ["alice", "Alice", "Unknown"] {
            feed.longterm.push(normalize(&row(json!("x"), json!(trader), json!(1))));
        }

        assert_eq!(aggregate(&feed).distinct_trader_count, 3);
    }

    #[test]
    fn active_count_covers_every_bucket_and_ignores_blank_status() {
        let mut feed = Feed::default();
        feed.intraday.push(normalize(&row(json!("Active"), json!("A"), json!(1))));
        feed.shortterm.push(normalize(&row(json!("LIVE"), json!("A"), json!(1))));
        feed.longterm.push(normalize(&row(json!("Closed"), json!("A"), json!(1))));
        feed.longterm.push(normalize(&row(json!(""), json!("A"), json!(1))));

        let stats = aggregate(&feed);
        assert_eq!(stats.total_count, 4);
        assert_eq!(stats.active_count, 2);
    }

    #[test]
    fn win_rate_rounds_to_nearest_percent() {
        assert_eq!(win_rate(2, 3), 67);
        assert_eq!(win_rate(1, 8), 13);
        assert_eq!(win_rate(0, 4), 0);
        assert_eq!(win_rate(0, 0), 0);
    }
}
