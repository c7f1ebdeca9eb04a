// src/report/utils.rs
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{Rate, NOT_SIGNIFICANT};

static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\+?([0-9]+)").expect("leading integer regex should be valid"));

static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
        .expect("leading float regex should be valid")
});

/// Leading run of ASCII digits, e.g. `"58"`, `" +58 "`, `"58abc"` → 58.
/// `None` for empty or non-numeric cells. Counts are unsigned, so `"-3"` is `None`,
/// and a run too large for `u32` is `None` as well rather than a wrapped value.
pub fn leading_int(raw: &str) -> Option<u32> {
    LEADING_INT
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Longest leading decimal number, e.g. `"72.5%"` → 72.5.
pub fn leading_float(raw: &str) -> Option<f64> {
    LEADING_FLOAT
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Count cell: absent or non-numeric reads as 0.
pub fn parse_count(raw: &str) -> u32 {
    leading_int(raw).unwrap_or(0)
}

/// Rate cell: the `ns` marker is `Unavailable`, anything else non-numeric reads as 0.
pub fn parse_rate(raw: &str) -> Rate {
    if raw.trim() == NOT_SIGNIFICANT {
        return Rate::Unavailable;
    }
    Rate::Value(leading_float(raw).unwrap_or(0.0))
}

/// Leading number of a situation label, e.g. "30 mois après le diplôme" → 30.
pub fn horizon_months(label: &str) -> Option<u32> {
    leading_int(label)
}
