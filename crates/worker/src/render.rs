use chrono::FixedOffset;
use market360_core::display::{format_date, format_pnl, format_price};
use market360_core::domain::recommendation::{Bucket, Recommendation};
use market360_core::ingest::error::IngestFailure;
use market360_core::pipeline::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Output {
    Text,
    Json,
}

pub fn render_text(outcome: &Result<Snapshot, IngestFailure>, offset: &FixedOffset) -> String {
    match outcome {
        Ok(snapshot) => render_snapshot(snapshot, offset),
        Err(failure) => render_failure(failure),
    }
}

fn render_snapshot(snapshot: &Snapshot, offset: &FixedOffset) -> String {
    let stats = &snapshot.stats;
    let mut lines = vec![format!(
        "Market360 | calls {} | active {} | win rate {}% | traders {}",
        stats.total_count, stats.active_count, stats.win_rate, stats.distinct_trader_count
    )];

    for bucket in Bucket::ALL {
        let recs = snapshot.feed.bucket(bucket);
        lines.push(String::new());
        lines.push(format!("== {} ({})", bucket.title(), recs.len()));
        if recs.is_empty() {
            lines.push(format!("   No {} Calls", bucket.title()));
        }
        for rec in recs {
            lines.extend(render_card(rec, offset));
        }
    }

    lines.join("\n")
}

fn render_card(rec: &Recommendation, offset: &FixedOffset) -> Vec<String> {
    let mut lines = vec![
        format!("-- {} {} [{}]", rec.symbol, rec.company, rec.status),
        format!(
            "   entry {} | target {} | stop loss {} | P&L {}",
            format_price(rec.entry),
            format_price(rec.target),
            format_price(rec.stop_loss),
            format_pnl(rec.profit_loss_percent)
        ),
        format!(
            "   {} | {} | {}",
            rec.trader,
            rec.sector,
            format_date(Some(rec.date.as_str()), offset)
        ),
    ];
    if let Some(remarks) = &rec.remarks {
        lines.push(format!("   {remarks}"));
    }
    lines
}

fn render_failure(failure: &IngestFailure) -> String {
    format!("Data Loading Error: {failure}\nRun again or check the feed.")
}

pub fn render_json(outcome: &Result<Snapshot, IngestFailure>) -> anyhow::Result<String> {
    let value = match outcome {
        Ok(snapshot) => {
            let mut v = serde_json::to_value(snapshot)?;
            v["success"] = serde_json::Value::Bool(true);
            v
        }
        Err(failure) => serde_json::json!({
            "success": false,
            "stage": failure.stage(),
            "error": failure.to_string(),
        }),
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use market360_core::display::date::IST;
    use market360_core::pipeline::build_snapshot;
    use serde_json::json;

    fn snapshot() -> Snapshot {
        let payload = json!({
            "success": true,
            "intraday": [
                ["2024-01-15", "RELIANCE", "Reliance Industries", 2450, 2600, 2380,
                 "Active", "Alice", "Energy", 2510, "3.2", "Book half at target"]
            ]
        });
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 4, 0, 0).unwrap();
        build_snapshot(&payload, at).unwrap()
    }

    #[test]
    fn text_view_shows_stats_cards_and_empty_buckets() {
        let text = render_text(&Ok(snapshot()), &IST);
        assert!(text.starts_with("Market360 | calls 1 | active 1 | win rate 100% | traders 1"));
        assert!(text.contains("-- RELIANCE Reliance Industries [Active]"));
        assert!(text.contains("entry 2,450 | target 2,600 | stop loss 2,380 | P&L +3.20%"));
        assert!(text.contains("Alice | Energy | 15 Jan 2024"));
        assert!(text.contains("Book half at target"));
        assert!(text.contains("No Short Term Calls"));
        assert!(text.contains("No Long Term Calls"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn text_view_reports_failure_instead_of_empty_feed() {
        let failure = IngestFailure::Declared {
            message: Some("Sheet not found".to_string()),
        };
        let text = render_text(&Err(failure), &IST);
        assert!(text.starts_with("Data Loading Error: feed reported failure: Sheet not found"));
        assert!(!text.contains("No Intraday Calls"));
    }

    #[test]
    fn json_view_flags_success() {
        let ok: serde_json::Value = serde_json::from_str(&render_json(&Ok(snapshot())).unwrap()).unwrap();
        assert_eq!(ok["success"], json!(true));
        assert_eq!(ok["stats"]["winRate"], json!(100));

        let failure = IngestFailure::Malformed {
            detail: "no success flag and no recommendation buckets".to_string(),
        };
        let err: serde_json::Value = serde_json::from_str(&render_json(&Err(failure)).unwrap()).unwrap();
        assert_eq!(err["success"], json!(false));
        assert_eq!(err["stage"], json!("malformed"));
    }
}
