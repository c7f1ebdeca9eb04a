// src/query/mod.rs
use serde::Serialize;
use std::collections::HashMap;

use crate::report::{InsertionRecord, Rate};

/// Immutable filter parameters; `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub year: Option<u16>,
    pub institution: Option<String>,
    pub discipline: Option<String>,
    pub horizon_months: Option<u32>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    pub fn with_discipline(mut self, discipline: impl Into<String>) -> Self {
        self.discipline = Some(discipline.into());
        self
    }

    pub fn with_horizon(mut self, months: u32) -> Self {
        self.horizon_months = Some(months);
        self
    }

    pub fn matches(&self, record: &InsertionRecord) -> bool {
        self.year.map_or(true, |y| record.year == y)
            && self
                .institution
                .as_deref()
                .map_or(true, |i| record.institution == i)
            && self
                .discipline
                .as_deref()
                .map_or(true, |d| record.discipline == d)
            && self
                .horizon_months
                .map_or(true, |m| record.horizon_months == Some(m))
    }
}

/// Records matching `filter`, in their original order.
pub fn filter<'a>(records: &'a [InsertionRecord], filter: &Filter) -> Vec<&'a InsertionRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// Text fields a selection widget can enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Institution,
    Discipline,
}

impl Field {
    fn get<'a>(&self, record: &'a InsertionRecord) -> &'a str {
        match self {
            Field::Institution => &record.institution,
            Field::Discipline => &record.discipline,
        }
    }
}

/// Distinct values of `field`, in first-appearance order.
pub fn distinct(records: &[InsertionRecord], field: Field) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    records
        .iter()
        .map(|r| field.get(r))
        .filter(|v| seen.insert(*v))
        .map(str::to_owned)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Discipline,
    Institution,
    Year,
}

impl GroupKey {
    fn key(&self, record: &InsertionRecord) -> String {
        match self {
            GroupKey::Discipline => record.discipline.clone(),
            GroupKey::Institution => record.institution.clone(),
            GroupKey::Year => record.year.to_string(),
        }
    }
}

/// Group records by `key`. Groups come in first-appearance order, and records
/// keep their original order inside each group.
pub fn group_by<'a>(
    records: &'a [InsertionRecord],
    key: GroupKey,
) -> Vec<(String, Vec<&'a InsertionRecord>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&InsertionRecord>)> = Vec::new();
    for record in records {
        let k = key.key(record);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![record]));
            }
        }
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];

    /// Label used by the report's selection lists.
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Female => "Femmes",
            Sex::Male => "Hommes",
        }
    }

    /// Accepts the report labels as well as plain English names, case-insensitively.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "femmes" | "female" | "f" => Some(Sex::Female),
            "hommes" | "male" | "m" => Some(Sex::Male),
            _ => None,
        }
    }

    /// The derived insertion rate of this sex on `record`.
    pub fn insertion_rate(&self, record: &InsertionRecord) -> Rate {
        match self {
            Sex::Female => record.female_insertion_rate,
            Sex::Male => record.male_insertion_rate,
        }
    }

    /// Headcount of this sex on `record`.
    pub fn respondents(&self, record: &InsertionRecord) -> i64 {
        match self {
            Sex::Female => record.female_respondents as i64,
            Sex::Male => record.male_respondents,
        }
    }
}

/// Values for the selection widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceLists {
    pub institutions: Vec<String>,
    pub disciplines: Vec<String>,
    pub sexes: Vec<&'static str>,
}

impl ChoiceLists {
    pub fn from_records(records: &[InsertionRecord]) -> Self {
        Self {
            institutions: distinct(records, Field::Institution),
            disciplines: distinct(records, Field::Discipline),
            sexes: Sex::ALL.iter().map(Sex::label).collect(),
        }
    }
}
