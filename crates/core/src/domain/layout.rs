//! Positional layout of a feed row.
//!
//! The feed delivers each recommendation either as a JSON array or as a JSON
//! object whose key order mirrors the array order. Both shapes are read through
//! [`RawEntry`], which only knows positions, never key names. What each
//! position means and how it degrades when the value is bad lives in [`LAYOUT`].

use serde_json::Value;

/// Bumped whenever a position in [`LAYOUT`] changes meaning.
pub const FIELD_LAYOUT_VERSION: u16 = 1;

/// Substituted for any numeric field that does not parse.
pub const NUMBER_DEFAULT: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Symbol,
    Company,
    Entry,
    Target,
    StopLoss,
    Status,
    Trader,
    Sector,
    CurrentPrice,
    ProfitLossPercent,
    Remarks,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Policy {
    /// Trimmed text, `default` when absent or blank.
    Text { default: &'static str },
    /// Trimmed text, `None` when absent or blank.
    OptionalText,
    /// Permissive decimal, [`NUMBER_DEFAULT`] when unparseable.
    Number,
}

pub const LAYOUT: [(Field, Policy); 12] = [
    (Field::Date, Policy::Text { default: "" }),
    (Field::Symbol, Policy::Text { default: "N/A" }),
    (Field::Company, Policy::Text { default: "N/A" }),
    (Field::Entry, Policy::Number),
    (Field::Target, Policy::Number),
    (Field::StopLoss, Policy::Number),
    (Field::Status, Policy::Text { default: "ACTIVE" }),
    (Field::Trader, Policy::Text { default: "Expert Trader" }),
    (Field::Sector, Policy::Text { default: "Unknown" }),
    (Field::CurrentPrice, Policy::Number),
    (Field::ProfitLossPercent, Policy::Number),
    (Field::Remarks, Policy::OptionalText),
];

impl Field {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn policy(self) -> Policy {
        LAYOUT[self.index()].1
    }
}

/// One feed row viewed as a positional sequence of scalars.
#[derive(Debug, Clone, Default)]
pub struct RawEntry<'a> {
    fields: Vec<&'a Value>,
}

impl<'a> RawEntry<'a> {
    /// Arrays are taken as-is and objects by insertion order. Anything else has
    /// no fields, so every lookup falls back to its default.
    pub fn from_value(value: &'a Value) -> Self {
        let fields = match value {
            Value::Array(items) => items.iter().collect(),
            Value::Object(map) => map.values().collect(),
            _ => Vec::new(),
        };
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&'a Value> {
        self.fields.get(field.index()).copied()
    }

    /// The value as the feed reported it, before any default is applied.
    pub fn reported_text(&self, field: Field) -> Option<String> {
        self.get(field).and_then(scalar_text)
    }

    pub fn reported_number(&self, field: Field) -> Option<f64> {
        self.get(field).and_then(parse_number)
    }

    pub fn text(&self, field: Field) -> String {
        let default = match field.policy() {
            Policy::Text { default } => default,
            Policy::OptionalText | Policy::Number => "",
        };
        self.reported_text(field)
            .unwrap_or_else(|| default.to_string())
    }

    pub fn number(&self, field: Field) -> f64 {
        self.reported_number(field).unwrap_or(NUMBER_DEFAULT)
    }
}

/// Text form of a scalar. Blank strings, null and containers have none.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

const CURRENCY_PREFIXES: [&str; 4] = ["₹", "Rs.", "Rs", "$"];

/// Lenient decimal parse for spreadsheet cells such as `"₹1,250"`, `"-3.5%"`
/// or `"12.5 pts"`.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let mut s = text.trim();
    for prefix in CURRENCY_PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start();
            break;
        }
    }
    let s = s.strip_suffix('%').unwrap_or(s).trim_end();
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        Ok(_) => None,
        Err(_) => leading_decimal(&cleaned),
    }
}

fn leading_decimal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let mut digits = 0;
    let mut seen_dot = false;
    while let Some(&b) = bytes.get(end) {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if digits == 0 {
        return None;
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
