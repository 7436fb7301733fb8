use crate::domain::layout::{scalar_text, RawEntry};
use crate::domain::recommendation::{Bucket, Feed, Recommendation};
use crate::ingest::error::IngestFailure;
use serde_json::{Map, Value};

pub fn parse_payload(text: &str) -> Result<Feed, IngestFailure> {
    let payload = serde_json::from_str::<Value>(text).map_err(|err| IngestFailure::InvalidJson {
        detail: err.to_string(),
    })?;
    normalize_feed(&payload)
}

/// Missing or null buckets are empty. A payload that declares failure, or
/// does not look like a feed at all, is an [`IngestFailure`].
pub fn normalize_feed(payload: &Value) -> Result<Feed, IngestFailure> {
    let Some(obj) = payload.as_object() else {
        return Err(IngestFailure::Malformed {
            detail: format!("expected a JSON object, got {}", kind(payload)),
        });
    };

    match obj.get("success") {
        Some(flag) if is_success(flag) => {}
        Some(_) => {
            return Err(IngestFailure::Declared {
                message: failure_message(obj),
            })
        }
        None => {
            if !Bucket::ALL.iter().any(|b| obj.contains_key(b.key())) {
                return Err(IngestFailure::Malformed {
                    detail: "no success flag and no recommendation buckets".to_string(),
                });
            }
        }
    }

    let mut feed = Feed::default();
    let mut shapeless: usize = 0;
    for bucket in Bucket::ALL {
        let rows = bucket_rows(obj, bucket)?;
        let out = feed.bucket_mut(bucket);
        out.reserve(rows.len());
        for row in rows {
            if !(row.is_array() || row.is_object()) {
                shapeless += 1;
            }
            out.push(Recommendation::from_raw(&RawEntry::from_value(row)));
        }
    }

    if shapeless > 0 {
        tracing::warn!(shapeless, "feed rows that are neither list nor object normalized to defaults");
    }
    tracing::debug!(
        intraday = feed.intraday.len(),
        shortterm = feed.shortterm.len(),
        longterm = feed.longterm.len(),
        "normalized feed"
    );

    Ok(feed)
}

fn bucket_rows(obj: &Map<String, Value>, bucket: Bucket) -> Result<&[Value], IngestFailure> {
    match obj.get(bucket.key()) {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(Value::Array(rows)) => Ok(rows.as_slice()),
        Some(other) => Err(IngestFailure::Malformed {
            detail: format!("bucket {} must be an array, got {}", bucket.key(), kind(other)),
        }),
    }
}

fn is_success(flag: &Value) -> bool {
    match flag {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn failure_message(obj: &Map<String, Value>) -> Option<String> {
    obj.get("error")
        .or_else(|| obj.get("message"))
        .and_then(scalar_text)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_all_three_buckets_in_feed_order() {
        let payload = json!({
            "success": true,
            "intraday": [
                ["2024-01-15", "SBIN", "State Bank", 600, 620, 590, "Active", "Alice", "Banking", 605, 0.8],
                ["2024-01-15", "ITC", "ITC Ltd", 440, 455, 432, "Active", "Bob", "FMCG", 441, 0.2]
            ],
            "shortterm": [
                {"date": "2024-01-10", "symbol": "TCS", "company": "TCS", "entry": 3500}
            ],
            "longterm": []
        });

        let feed = normalize_feed(&payload).unwrap();
        let symbols: Vec<_> = feed.intraday.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["SBIN", "ITC"]);
        assert_eq!(feed.shortterm[0].entry, 3500.0);
        assert!(feed.longterm.is_empty());
    }

    #[test]
    fn missing_and_null_buckets_are_empty() {
        let payload = json!({"success": true, "intraday": null});
        let feed = normalize_feed(&payload).unwrap();
        assert!(feed.is_empty());
    }

    #[test]
    fn buckets_without_success_flag_are_accepted() {
        let payload = json!({"longterm": [["2024-01-15", "HDFC"]]});
        let feed = normalize_feed(&payload).unwrap();
        assert_eq!(feed.longterm.len(), 1);
    }

    #[test]
    fn declared_failure_is_not_an_empty_feed() {
        let payload = json!({"success": false, "error": "Sheet not found", "intraday": []});
        let err = normalize_feed(&payload).unwrap_err();
        assert_eq!(
            err,
            IngestFailure::Declared {
                message: Some("Sheet not found".to_string())
            }
        );
    }

    #[test]
    fn rejects_payloads_without_feed_structure() {
        for payload in [json!([]), json!("ok"), json!({}), json!({"status": "ok"})] {
            let err = normalize_feed(&payload).unwrap_err();
            assert!(matches!(err, IngestFailure::Malformed { .. }), "{payload}");
        }
    }

    #[test]
    fn rejects_non_array_bucket() {
        let payload = json!({"success": true, "intraday": "none"});
        let err = normalize_feed(&payload).unwrap_err();
        assert!(matches!(err, IngestFailure::Malformed { .. }));
    }

    #[test]
    fn shapeless_rows_are_kept_with_defaults() {
        let payload = json!({"success": "true", "intraday": [7, null, ["2024-01-15", "SBIN"]]});
        let feed = normalize_feed(&payload).unwrap();
        assert_eq!(feed.intraday.len(), 3);
        assert_eq!(feed.intraday[0].symbol, "N/A");
        assert_eq!(feed.intraday[2].symbol, "SBIN");
    }

    #[test]
    fn parse_payload_reports_invalid_json() {
        let err = parse_payload("<html>Service unavailable</html>").unwrap_err();
        assert_eq!(err.stage(), "invalid_json");
    }
}
