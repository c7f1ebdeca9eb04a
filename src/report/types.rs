// src/report/types.rs

use serde::{Serialize, Serializer};
use std::fmt;

/// Literal the report uses for a rate suppressed on a small sample ("non significatif").
pub const NOT_SIGNIFICANT: &str = "ns";

/// A percentage in [0, 100], or the report's "not significant" marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rate {
    Value(f64),
    Unavailable,
}

impl Rate {
    pub fn value(&self) -> Option<f64> {
        match self {
            Rate::Value(v) => Some(*v),
            Rate::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Rate::Value(_))
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::Value(v) => write!(f, "{}", v),
            Rate::Unavailable => f.write_str(NOT_SIGNIFICANT),
        }
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rate::Value(v) => serializer.serialize_f64(*v),
            Rate::Unavailable => serializer.serialize_str(NOT_SIGNIFICANT),
        }
    }
}

/// One row of the insertion report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertionRecord {
    /// 1-based line in the source text; the header is line 1.
    pub line_number: usize,
    pub year: u16,
    pub institution: String,
    pub academy: String,
    pub domain: String,
    pub discipline: String,
    /// e.g. "18 mois après le diplôme"
    pub situation_label: String,
    /// Leading number of the situation label (18, 30).
    pub horizon_months: Option<u32>,
    pub response_rate: Rate,
    pub insertion_rate: Rate,
    /// Respondent count as read from the report, `None` when the cell is not numeric.
    pub respondents: Option<u32>,
    pub female_respondents: u32,
    /// Parsed total minus female count. Negative when the report is inconsistent.
    pub male_respondents: i64,
    pub stable_employment: u32,
    pub full_time_employment: u32,
    pub executive_employment: u32,
    pub female_insertion_rate: Rate,
    pub male_insertion_rate: Rate,
}

impl InsertionRecord {
    /// Respondent count used as a denominator: falls back to 1 when the report has none.
    pub fn total_respondents(&self) -> u32 {
        self.respondents.unwrap_or(1)
    }

    /// True when the female count exceeds the total, leaving a negative male count.
    pub fn has_inconsistent_headcount(&self) -> bool {
        self.male_respondents < 0
    }

    /// Executive plus stable jobs; drives the point size in the scatter view.
    pub fn employment_volume(&self) -> u64 {
        self.executive_employment as u64 + self.stable_employment as u64
    }
}
