// src/report/split.rs
use once_cell::sync::Lazy;
use regex::Regex;

/// `<year> <institution>  <rest>`: the institution stops at the first run of 2+ whitespace.
static ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})\s+(.+?)\s{2,}(.+)$").expect("line anchor regex should be valid")
});

/// Column delimiter of the report: two or more whitespace characters.
static COLUMN_GAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("column gap regex should be valid"));

/// Two numeric columns glued together by a single space, e.g. `"65 80"`.
static MERGED_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9] [0-9]").expect("merged digits regex should be valid"));

/// A count glued to a not-significant rate, e.g. `"12 ns"`.
static COUNT_THEN_NS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\s+ns$").expect("count/ns regex should be valid"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex should be valid"));

/// Rest columns before this index (academy, domain) are never re-split.
const FIRST_RESPLIT_REST_COLUMN: usize = 2;

/// A line broken into `[year, institution, academy, domain, discipline.., situation, ..]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitLine<'a> {
    pub year: &'a str,
    pub columns: Vec<&'a str>,
}

/// Split `text` on runs of 2+ whitespace. Single spaces stay inside a field.
pub fn split_columns(text: &str) -> Vec<&str> {
    COLUMN_GAP.split(text).collect()
}

/// Anchor a trimmed line on its leading year and institution, then split the rest.
/// Returns `None` when the line does not start with a 4-digit year followed by
/// an institution and at least one more column.
pub fn split_line(line: &str) -> Option<SplitLine<'_>> {
    let caps = ANCHOR.captures(line)?;
    let year = caps.get(1)?.as_str();
    let institution = caps.get(2)?.as_str();
    let rest = caps.get(3)?.as_str();

    let mut columns = vec![year, institution];
    for (idx, col) in split_columns(rest).into_iter().enumerate() {
        if idx >= FIRST_RESPLIT_REST_COLUMN && is_merged(col) {
            columns.extend(WHITESPACE.split(col).filter(|s| !s.is_empty()));
        } else {
            columns.push(col);
        }
    }

    Some(SplitLine { year, columns })
}

fn is_merged(col: &str) -> bool {
    MERGED_DIGITS.is_match(col) || COUNT_THEN_NS.is_match(col)
}
