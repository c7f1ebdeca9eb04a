// src/view/mod.rs
//! View-models for the chart front-ends. Everything here is a pure function of the
//! already-extracted records; drawing and event handling belong to the UI.

use serde::Serialize;

use crate::query::{self, ChoiceLists, Filter, Sex};
use crate::report::InsertionRecord;

/// Horizons the dashboard draws one bar chart for.
pub const HORIZONS: [u32; 2] = [18, 30];

/// Annotation for a bar whose rate is not significant.
pub const MISSING_RATE_NOTE: &str = "Taux non renseigné";

/// Size of the categorical palette discipline colours cycle through.
pub const PALETTE_SIZE: usize = 10;

pub const MIN_RADIUS: f64 = 2.0;
pub const MAX_RADIUS: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    /// `None` when the rate is not significant.
    pub value: Option<f64>,
    pub note: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub bars: Vec<Bar>,
    /// Upper bound of the value axis.
    pub y_max: f64,
}

/// Insertion rate per discipline at one horizon.
pub fn insertion_by_discipline(records: &[InsertionRecord], horizon_months: u32) -> BarChart {
    let bars: Vec<Bar> = query::filter(records, &Filter::new().with_horizon(horizon_months))
        .into_iter()
        .map(|r| {
            let value = r.insertion_rate.value();
            Bar {
                label: r.discipline.clone(),
                value,
                note: value.is_none().then_some(MISSING_RATE_NOTE),
            }
        })
        .collect();

    let y_max = bars.iter().filter_map(|b| b.value).fold(0.0, f64::max);
    BarChart {
        title: format!("Taux d'insertion après {} mois", horizon_months),
        x_label: "Discipline",
        y_label: "Taux d'insertion",
        bars,
        y_max,
    }
}

/// What the user picked in the selection widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub institution: String,
    pub discipline: String,
    pub sex: Sex,
}

impl Selection {
    /// First institution, first discipline, women: the initial state of the lists.
    pub fn first_of(choices: &ChoiceLists) -> Option<Self> {
        Some(Self {
            institution: choices.institutions.first()?.clone(),
            discipline: choices.disciplines.first()?.clone(),
            sex: Sex::Female,
        })
    }

    pub fn filter(&self) -> Filter {
        Filter::new()
            .with_institution(self.institution.clone())
            .with_discipline(self.discipline.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderChart {
    pub sex: Sex,
    pub chart: BarChart,
}

/// `2010 (18 mois)`; rows of one year at different horizons stay apart.
fn year_label(record: &InsertionRecord) -> String {
    match record.horizon_months {
        Some(months) => format!("{} ({} mois)", record.year, months),
        None => record.year.to_string(),
    }
}

/// Derived insertion rate of the selected sex, one bar per matching record, by year.
/// `None` when nothing matches the selection.
pub fn gender_chart(records: &[InsertionRecord], selection: &Selection) -> Option<GenderChart> {
    let matching = query::filter(records, &selection.filter());
    if matching.is_empty() {
        return None;
    }

    let bars = matching
        .into_iter()
        .map(|r| {
            let value = selection.sex.insertion_rate(r).value();
            Bar {
                label: year_label(r),
                value,
                note: value.is_none().then_some(MISSING_RATE_NOTE),
            }
        })
        .collect();

    Some(GenderChart {
        sex: selection.sex,
        chart: BarChart {
            title: format!(
                "{} - {} ({})",
                selection.institution,
                selection.discipline,
                selection.sex.label()
            ),
            x_label: "Année",
            y_label: "Taux d'insertion",
            bars,
            y_max: 100.0,
        },
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub line_number: usize,
    pub sex: Sex,
    pub discipline: String,
    pub radius: f64,
    /// Index into a categorical palette of [`PALETTE_SIZE`] colours.
    pub color: usize,
    pub tooltip: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter {
    pub points: Vec<Point>,
}

/// Square-root scale from `[0, max]` onto `[MIN_RADIUS, MAX_RADIUS]`.
/// A degenerate domain maps everything to the middle of the range.
fn radius(volume: u64, max: u64) -> f64 {
    let t = if max == 0 {
        0.5
    } else {
        (volume as f64).sqrt() / (max as f64).sqrt()
    };
    MIN_RADIUS + t * (MAX_RADIUS - MIN_RADIUS)
}

/// Employment volume per record, one point per sex present, for records with a
/// significant insertion rate. Men are listed before women.
pub fn scatter(records: &[InsertionRecord]) -> Scatter {
    let disciplines = query::distinct(records, query::Field::Discipline);
    let max_volume = records
        .iter()
        .map(InsertionRecord::employment_volume)
        .max()
        .unwrap_or(0);

    let mut points = Vec::new();
    for sex in [Sex::Male, Sex::Female] {
        for r in records
            .iter()
            .filter(|r| r.insertion_rate.is_available() && sex.respondents(r) > 0)
        {
            let color = disciplines
                .iter()
                .position(|d| *d == r.discipline)
                .unwrap_or(0)
                % PALETTE_SIZE;
            points.push(Point {
                line_number: r.line_number,
                sex,
                discipline: r.discipline.clone(),
                radius: radius(r.employment_volume(), max_volume),
                color,
                tooltip: vec![
                    r.discipline.clone(),
                    format!("Taux de réponse: {}%", r.response_rate),
                    format!("Taux d'insertion: {}%", r.insertion_rate),
                    format!("Sexe: {}", sex.label()),
                ],
            });
        }
    }
    Scatter { points }
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub choices: ChoiceLists,
    pub by_discipline: Vec<BarChart>,
    pub gender: Option<GenderChart>,
    pub scatter: Scatter,
}

/// Build the whole view-model. Re-run on every selection change; never re-parses.
pub fn render(records: &[InsertionRecord], selection: &Selection) -> DashboardView {
    DashboardView {
        choices: ChoiceLists::from_records(records),
        by_discipline: HORIZONS
            .iter()
            .map(|&h| insertion_by_discipline(records, h))
            .collect(),
        gender: gender_chart(records, selection),
        scatter: scatter(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{extract_records, fixtures::REPORT};

    fn selection(institution: &str, discipline: &str, sex: Sex) -> Selection {
        Selection {
            institution: institution.into(),
            discipline: discipline.into(),
            sex,
        }
    }

    #[test]
    fn bars_per_horizon() {
        let records = extract_records(REPORT);

        let at_18 = insertion_by_discipline(&records, 18);
        assert_eq!(at_18.title, "Taux d'insertion après 18 mois");
        let labels: Vec<&str> = at_18.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Sciences de la Vie", "Economie"]);
        assert_eq!(at_18.bars[1].value, Some(88.5));
        assert_eq!(at_18.y_max, 88.5);

        let at_30 = insertion_by_discipline(&records, 30);
        assert_eq!(at_30.bars[0].value, None);
        assert_eq!(at_30.bars[0].note, Some(MISSING_RATE_NOTE));
        assert_eq!(at_30.y_max, 92.0);

        let none = insertion_by_discipline(&[], 18);
        assert!(none.bars.is_empty());
        assert_eq!(none.y_max, 0.0);
    }

    #[test]
    fn gender_bars_by_year() {
        let records = extract_records(REPORT);

        let women = gender_chart(&records, &selection("Mulhouse - Haute Alsace", "Sciences de la Vie", Sex::Female))
            .expect("selection matches two rows");
        assert_eq!(women.chart.y_max, 100.0);
        assert_eq!(women.chart.bars.len(), 2);
        let labels: Vec<&str> = women.chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2010 (18 mois)", "2010 (30 mois)"]);
        assert_eq!(women.chart.bars[0].value, Some(30.0));
        assert_eq!(women.chart.bars[1].value, None);
        assert_eq!(women.chart.bars[1].note, Some(MISSING_RATE_NOTE));

        let men = gender_chart(&records, &selection("Mulhouse - Haute Alsace", "Sciences de la Vie", Sex::Male))
            .expect("selection matches two rows");
        assert_eq!(men.chart.bars[0].value, Some(20.0));

        assert!(gender_chart(&records, &selection("Lille 1", "Sciences de la Vie", Sex::Male)).is_none());
    }

    #[test]
    fn scatter_points() {
        let records = extract_records(REPORT);
        let scatter = scatter(&records);

        // rows 2 and 4 have a significant rate; row 5 has no headcount
        let men: Vec<usize> = scatter.points.iter().filter(|p| p.sex == Sex::Male).map(|p| p.line_number).collect();
        let women: Vec<usize> = scatter.points.iter().filter(|p| p.sex == Sex::Female).map(|p| p.line_number).collect();
        assert_eq!(men, vec![2, 4]);
        assert_eq!(women, vec![2, 4]);
        assert_eq!(scatter.points[0].sex, Sex::Male);

        let first = &scatter.points[0];
        assert_eq!(first.color, 0);
        assert_eq!(
            first.tooltip,
            vec![
                "Sciences de la Vie",
                "Taux de réponse: 72%",
                "Taux d'insertion: 50%",
                "Sexe: Hommes",
            ]
        );
        assert_eq!(scatter.points[1].color, 1);
    }

    #[test]
    fn radius_scale() {
        assert_eq!(radius(0, 100), MIN_RADIUS);
        assert_eq!(radius(100, 100), MAX_RADIUS);
        assert_eq!(radius(25, 100), 11.0);
        assert_eq!(radius(0, 0), 11.0);
    }

    #[test]
    fn render_is_repeatable() {
        let records = extract_records(REPORT);
        let choices = ChoiceLists::from_records(&records);
        let sel = Selection::first_of(&choices).expect("records are not empty");
        assert_eq!(sel.institution, "Mulhouse - Haute Alsace");

        let view = render(&records, &sel);
        assert_eq!(view.by_discipline.len(), 2);
        assert!(view.gender.is_some());
        assert_eq!(view, render(&records, &sel));

        assert!(Selection::first_of(&ChoiceLists::from_records(&[])).is_none());
    }
}
