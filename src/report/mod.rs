// src/report/mod.rs
pub mod derive;
pub mod split;
pub mod types;
pub mod utils;

use serde::Serialize;
use tracing::{debug, trace};

pub use derive::apportion;
pub use types::{InsertionRecord, Rate, NOT_SIGNIFICANT};

use split::{split_columns, split_line};
use utils::{horizon_months, parse_count, parse_rate};

/// Phrase that identifies the situation column ("18 mois après le diplôme").
pub const SITUATION_MARKER: &str = "mois après le diplôme";

/// Rows with fewer whole-line columns than this are filtered out.
pub const MIN_COLUMNS: usize = 10;

/// Fixed leading columns of a row.
const YEAR: usize = 0;
const INSTITUTION: usize = 1;
const ACADEMY: usize = 2;
const DOMAIN: usize = 3;

/// Offsets of the numeric columns, counted from the situation column.
mod offset {
    pub const RESPONDENTS: usize = 1;
    pub const RESPONSE_RATE: usize = 3;
    pub const INSERTION_RATE: usize = 4;
    pub const STABLE_EMPLOYMENT: usize = 6;
    pub const FULL_TIME_EMPLOYMENT: usize = 7;
    pub const EXECUTIVE_EMPLOYMENT: usize = 9;
    pub const FEMALE_RESPONDENTS: usize = 15;
}

/// Why a line produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// No leading year / institution / remainder.
    NotAnchored,
    /// Fewer than [`MIN_COLUMNS`] columns on the raw line.
    TooFewColumns,
    /// No column carries [`SITUATION_MARKER`] after the domain.
    NoSituation,
}

/// Counters of one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    /// Lines after the header.
    pub lines: usize,
    pub records: usize,
    pub not_anchored: usize,
    pub too_few_columns: usize,
    pub no_situation: usize,
    /// Records whose female count exceeds the total.
    pub inconsistent_headcount: usize,
}

impl ExtractStats {
    pub fn skipped(&self) -> usize {
        self.not_anchored + self.too_few_columns + self.no_situation
    }

    fn count_skip(&mut self, skip: Skip) {
        match skip {
            Skip::NotAnchored => self.not_anchored += 1,
            Skip::TooFewColumns => self.too_few_columns += 1,
            Skip::NoSituation => self.no_situation += 1,
        }
    }
}

/// Parse the full report text into records, in line order, skipping the header.
/// Malformed lines are dropped.
pub fn extract_records(raw: &str) -> Vec<InsertionRecord> {
    extract_records_with_stats(raw).0
}

/// Same as [`extract_records`], also counting what was dropped and why.
pub fn extract_records_with_stats(raw: &str) -> (Vec<InsertionRecord>, ExtractStats) {
    let mut stats = ExtractStats::default();
    let mut records = Vec::new();

    // line 1 is the header
    for (idx, line) in raw.split('\n').enumerate().skip(1) {
        stats.lines += 1;
        let line_number = idx + 1;
        match parse_line(line, line_number) {
            Ok(record) => {
                if record.has_inconsistent_headcount() {
                    stats.inconsistent_headcount += 1;
                }
                records.push(record);
            }
            Err(skip) => {
                trace!(line_number, ?skip, "skipping line");
                stats.count_skip(skip);
            }
        }
    }

    stats.records = records.len();
    debug!(
        lines = stats.lines,
        records = stats.records,
        skipped = stats.skipped(),
        "extracted insertion records"
    );
    (records, stats)
}

/// Parse a single report line.
pub fn parse_line(line: &str, line_number: usize) -> Result<InsertionRecord, Skip> {
    let trimmed = line.trim();
    let split = split_line(trimmed).ok_or(Skip::NotAnchored)?;
    // counted before the year split and the numeric re-split, both of which add columns
    if split_columns(trimmed).len() < MIN_COLUMNS {
        return Err(Skip::TooFewColumns);
    }
    let cols = &split.columns;

    let situation = cols
        .iter()
        .enumerate()
        .skip(DOMAIN + 1)
        .find(|(_, c)| c.contains(SITUATION_MARKER))
        .map(|(i, _)| i)
        .ok_or(Skip::NoSituation)?;

    // the source pads rows to 20 columns; a missing cell reads as empty
    let at = |off: usize| cols.get(situation + off).copied().unwrap_or("");

    let year: u16 = cols[YEAR].parse().map_err(|_| Skip::NotAnchored)?;
    let insertion_rate = parse_rate(at(offset::INSERTION_RATE));
    let respondents = utils::leading_int(at(offset::RESPONDENTS));
    let female_respondents = parse_count(at(offset::FEMALE_RESPONDENTS));
    let male_respondents = respondents.unwrap_or(0) as i64 - female_respondents as i64;
    let (female_insertion_rate, male_insertion_rate) =
        apportion(insertion_rate, female_respondents, male_respondents);

    let situation_label = cols[situation].to_string();
    Ok(InsertionRecord {
        line_number,
        year,
        institution: cols[INSTITUTION].to_string(),
        academy: cols[ACADEMY].to_string(),
        domain: cols[DOMAIN].to_string(),
        discipline: cols[DOMAIN + 1..situation].join(" "),
        horizon_months: horizon_months(&situation_label),
        situation_label,
        response_rate: parse_rate(at(offset::RESPONSE_RATE)),
        insertion_rate,
        respondents,
        female_respondents,
        male_respondents,
        stable_employment: parse_count(at(offset::STABLE_EMPLOYMENT)),
        full_time_employment: parse_count(at(offset::FULL_TIME_EMPLOYMENT)),
        executive_employment: parse_count(at(offset::EXECUTIVE_EMPLOYMENT)),
        female_insertion_rate,
        male_insertion_rate,
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::REPORT;
    use super::*;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,insertion::report=trace")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn row(cols: &[&str]) -> String {
        cols.join("  ")
    }

    #[test]
    fn extracts_the_sample_report() {
        init_test_logging();
        let (records, stats) = extract_records_with_stats(REPORT);

        // trailing newline leaves one empty, unanchored line
        assert_eq!(stats.lines, 5);
        assert_eq!(stats.records, 4);
        assert_eq!(stats.not_anchored, 1);
        assert_eq!(records.len(), 4);

        let first = &records[0];
        assert_eq!(first.line_number, 2);
        assert_eq!(first.year, 2010);
        assert_eq!(first.institution, "Mulhouse - Haute Alsace");
        assert_eq!(first.academy, "Strasbourg");
        assert_eq!(first.domain, "Sciences, technologies et santé");
        assert_eq!(first.discipline, "Sciences de la Vie");
        assert_eq!(first.situation_label, "18 mois après le diplôme");
        assert_eq!(first.horizon_months, Some(18));
        assert_eq!(first.respondents, Some(50));
        assert_eq!(first.response_rate, Rate::Value(72.0));
        assert_eq!(first.insertion_rate, Rate::Value(50.0));
        assert_eq!(first.stable_employment, 70);
        assert_eq!(first.full_time_employment, 80);
        assert_eq!(first.executive_employment, 40);
        assert_eq!(first.female_respondents, 30);
        assert_eq!(first.male_respondents, 20);
        assert_eq!(first.female_insertion_rate, Rate::Value(30.0));
        assert_eq!(first.male_insertion_rate, Rate::Value(20.0));
    }

    #[test]
    fn not_significant_insertion_rate() {
        let records = extract_records(REPORT);
        let second = &records[1];
        assert_eq!(second.horizon_months, Some(30));
        assert_eq!(second.insertion_rate, Rate::Unavailable);
        assert_eq!(second.female_insertion_rate, Rate::Unavailable);
        assert_eq!(second.male_insertion_rate, Rate::Unavailable);
    }

    #[test]
    fn merged_numeric_columns_are_resplit() {
        let records = extract_records(REPORT);
        // "60 90" is two columns glued by a single space
        let third = &records[2];
        assert_eq!(third.institution, "Lille 1");
        assert_eq!(third.insertion_rate, Rate::Value(88.5));
        assert_eq!(third.stable_employment, 60);
        assert_eq!(third.full_time_employment, 90);
        assert_eq!(third.executive_employment, 55);
        assert_eq!(third.female_respondents, 70);
        assert_eq!(third.male_respondents, 50);
    }

    #[test]
    fn missing_total_keeps_neutral_denominator() {
        let records = extract_records(REPORT);
        let fourth = &records[3];
        assert_eq!(fourth.respondents, None);
        assert_eq!(fourth.total_respondents(), 1);
        assert_eq!(fourth.response_rate, Rate::Unavailable);
        assert_eq!(fourth.female_respondents, 0);
        assert_eq!(fourth.male_respondents, 0);
        // defined total rate but no headcount
        assert_eq!(fourth.insertion_rate, Rate::Value(92.0));
        assert_eq!(fourth.female_insertion_rate, Rate::Unavailable);
        assert_eq!(fourth.male_insertion_rate, Rate::Unavailable);
    }

    #[test]
    fn short_rows_are_skipped() {
        let text = format!(
            "header\n{}",
            row(&["2010 Nancy", "Nancy-Metz", "Lettres", "Histoire", "18 mois après le diplôme", "40", "3", "70"])
        );
        let (records, stats) = extract_records_with_stats(&text);
        assert!(records.is_empty());
        assert_eq!(stats.too_few_columns, 1);
    }

    #[test]
    fn column_minimum_counts_the_raw_line() {
        let ten = [
            "2010 Nancy", "Nancy-Metz", "Lettres", "Histoire", "18 mois après le diplôme", "40", "3", "70", "80", "60",
        ];
        assert_eq!(split_columns(&row(&ten)).len(), 10);
        let text = format!("header\n{}", row(&ten));
        assert_eq!(extract_records(&text).len(), 1);

        // 9 columns become 10 once the year is split off
        let nine = format!("header\n{}", row(&ten[..9]));
        let (records, stats) = extract_records_with_stats(&nine);
        assert!(records.is_empty());
        assert_eq!(stats.too_few_columns, 1);

        // 7 columns become 10 after the year split and two numeric re-splits
        let merged = row(&[
            "2010 Nancy", "Nancy-Metz", "Lettres", "Histoire", "18 mois après le diplôme", "40 3", "70 80",
        ]);
        assert_eq!(split_columns(&merged).len(), 7);
        let (records, stats) = extract_records_with_stats(&format!("header\n{}", merged));
        assert!(records.is_empty());
        assert_eq!(stats.too_few_columns, 1);
    }

    #[test]
    fn rows_without_situation_are_skipped() {
        let text = format!(
            "header\n{}",
            row(&["2010 Nancy", "Nancy-Metz", "Lettres", "Histoire", "18 mois", "40", "3", "70", "80", "60", "50", "40"])
        );
        let (records, stats) = extract_records_with_stats(&text);
        assert!(records.is_empty());
        assert_eq!(stats.no_situation, 1);
    }

    #[test]
    fn over_split_discipline_is_reassembled() {
        // double spaces inside the discipline split it into fragments
        let text = format!(
            "header\n{}",
            row(&[
                "2013 Tours", "Orléans-Tours", "Sciences, technologies et santé", "Sciences", "de la", "Vie",
                "18 mois après le diplôme", "40", "3", "70", "80", "60", "50", "40",
            ])
        );
        let records = extract_records(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].discipline, "Sciences de la Vie");
        assert_eq!(records[0].insertion_rate, Rate::Value(80.0));
        assert_eq!(records[0].respondents, Some(40));
    }

    #[test]
    fn missing_trailing_columns_read_as_absent() {
        let text = format!(
            "header\n{}",
            row(&["2014 Pau", "Bordeaux", "Lettres", "Philosophie", "18 mois après le diplôme", "40", "3", "70", "80", "60"])
        );
        let records = extract_records(&text);
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.stable_employment, 0);
        assert_eq!(rec.executive_employment, 0);
        assert_eq!(rec.female_respondents, 0);
        assert_eq!(rec.male_respondents, 40);
        assert_eq!(rec.female_insertion_rate, Rate::Value(0.0));
        assert_eq!(rec.male_insertion_rate, Rate::Value(80.0));
    }

    #[test]
    fn negative_male_count_is_surfaced() {
        let mut cols = vec![
            "2015 Caen", "Caen", "Lettres", "Histoire", "18 mois après le diplôme", "10", "3", "70", "90",
        ];
        cols.extend(std::iter::repeat("1").take(10));
        cols.push("12");
        let text = format!("header\n{}", row(&cols));
        let (records, stats) = extract_records_with_stats(&text);
        assert_eq!(records[0].female_respondents, 12);
        assert_eq!(records[0].male_respondents, -2);
        assert!(records[0].has_inconsistent_headcount());
        assert_eq!(stats.inconsistent_headcount, 1);
    }

    #[test]
    fn never_more_records_than_lines() {
        let cases = [
            "",
            "header",
            "header\n",
            REPORT,
            "header\ngarbage\n2010 x\n\n   \n",
        ];
        for text in cases {
            let lines = text.split('\n').count();
            let records = extract_records(text);
            assert!(records.len() <= lines.saturating_sub(1), "{text:?}");
        }

        let well_formed: String = REPORT.trim_end().to_string();
        let lines = well_formed.split('\n').count();
        assert_eq!(extract_records(&well_formed).len(), lines - 1);
    }

    #[test]
    fn extraction_is_idempotent() {
        assert_eq!(extract_records(REPORT), extract_records(REPORT));
    }

    #[test]
    fn crlf_lines_are_trimmed() {
        let text = REPORT.replace('\n', "\r\n");
        let records = extract_records(&text);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].female_respondents, 30);
    }
}
