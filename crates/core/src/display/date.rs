use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Indian Standard Time, the offset dates are shown in unless configured.
pub const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// `15 Jan 2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%-d %b %Y";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%d %b %Y", "%d %B %Y"];

pub const IST: FixedOffset = match FixedOffset::east_opt(IST_OFFSET_SECS) {
    Some(offset) => offset,
    None => panic!("IST offset out of range"),
};

/// Human-readable date. Unparseable input falls back to its first ten
/// characters, absent input to `"N/A"`.
pub fn format_date(raw: Option<&str>, offset: &FixedOffset) -> String {
    let Some(text) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "N/A".to_string();
    };

    match parse_date(text, offset) {
        Some(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        None => text.chars().take(10).collect(),
    }
}

/// Timestamps with a zone are shifted into `offset` before taking the date.
pub fn parse_date(text: &str, offset: &FixedOffset) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(offset).date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}
