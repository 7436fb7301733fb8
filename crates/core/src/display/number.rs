use crate::domain::layout::parse_number;
use serde_json::Value;

/// Whole-rupee price with Indian digit grouping, e.g. `12,34,568`.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let rounded = value.round();
    let grouped = group_indian(&format!("{:.0}", rounded.abs()));
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// [`format_price`] for an untyped feed cell; unparseable or absent is `"0"`.
pub fn format_price_value(value: Option<&Value>) -> String {
    format_price(value.and_then(parse_number).unwrap_or(0.0))
}

/// Signed percentage with two decimals. Zero is shown as `+0.00%`.
pub fn format_pnl(value: f64) -> String {
    let value = if value.is_finite() && value != 0.0 { value } else { 0.0 };
    if value >= 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

// Last three digits, then pairs: 1234567 -> 12,34,567.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut pairs = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        pairs.push(pair);
        head = rest;
    }
    if !head.is_empty() {
        pairs.push(head);
    }
    pairs.reverse();

    format!("{},{tail}", pairs.join(","))
}
