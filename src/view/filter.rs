use chrono::NaiveDate;
use derive_new::new;
use serde::{Deserialize, Serialize};
use snafu::Snafu;

use crate::model::{CountryGroup, Record};

/// Closed range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Records with an unparsable date are never contained.
    pub fn contains(&self, record: &Record) -> bool {
        record
            .day
            .map(|day| self.start <= day.day() && day.day() <= self.end)
            .unwrap_or(false)
    }
}

/// A numeric column of the table that the min/max bounds can be applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Cases,
    Deaths,
    TotalCases,
    TotalDeaths,
    CasesOn1000,
    DeathsOn1000,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Cases,
        Metric::Deaths,
        Metric::TotalCases,
        Metric::TotalDeaths,
        Metric::CasesOn1000,
        Metric::DeathsOn1000,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Metric::Cases => "cases",
            Metric::Deaths => "deaths",
            Metric::TotalCases => "totalCases",
            Metric::TotalDeaths => "totalDeaths",
            Metric::CasesOn1000 => "casesOn1000",
            Metric::DeathsOn1000 => "deathsOn1000",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Cases => "Cases",
            Metric::Deaths => "Deaths",
            Metric::TotalCases => "Total cases",
            Metric::TotalDeaths => "Total deaths",
            Metric::CasesOn1000 => "Cases / 1000",
            Metric::DeathsOn1000 => "Deaths / 1000",
        }
    }
}

impl std::str::FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.key() == input)
            .ok_or_else(|| UnknownMetric {
                text: input.to_string(),
            })
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("unknown metric `{text}`"))]
pub struct UnknownMetric {
    pub text: String,
}

/// The table's filter inputs. `None` bounds are open.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub metric: Option<Metric>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub country_searched: String,
}

impl FilterState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, row: &DisplayRow) -> bool {
        let in_bounds = match self.metric {
            None => true,
            Some(metric) => {
                let value = row.value(metric);
                self.min_value.map_or(true, |min| value >= min)
                    && self.max_value.map_or(true, |max| value <= max)
            }
        };

        in_bounds
            && row
                .country
                .to_lowercase()
                .contains(&self.country_searched.to_lowercase())
    }
}

/// One table row: a country's figures over the active range next to its all-time totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub country: String,
    pub cases: i64,
    pub deaths: i64,
    pub total_cases: i64,
    pub total_deaths: i64,
    /// Period cases divided by a flat 1000; not a per-capita rate.
    pub cases_on_1000: f64,
    pub deaths_on_1000: f64,
}

impl DisplayRow {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Cases => self.cases as f64,
            Metric::Deaths => self.deaths as f64,
            Metric::TotalCases => self.total_cases as f64,
            Metric::TotalDeaths => self.total_deaths as f64,
            Metric::CasesOn1000 => self.cases_on_1000,
            Metric::DeathsOn1000 => self.deaths_on_1000,
        }
    }
}

impl From<&CountryGroup> for DisplayRow {
    /// Summarise a group whose records have already been narrowed to a period.
    fn from(group: &CountryGroup) -> Self {
        let cases: i64 = group.records.iter().map(|r| r.cases).sum();
        let deaths: i64 = group.records.iter().map(|r| r.deaths).sum();

        Self {
            country: group.country.clone(),
            cases,
            deaths,
            total_cases: group.total_cases,
            total_deaths: group.total_deaths,
            cases_on_1000: cases as f64 / 1000.0,
            deaths_on_1000: deaths as f64 / 1000.0,
        }
    }
}

/// Narrow every group's records to `range`, keeping the all-time totals as they were.
pub fn filter_period(groups: &[CountryGroup], range: DateRange) -> Vec<CountryGroup> {
    groups
        .iter()
        .map(|group| CountryGroup {
            country: group.country.clone(),
            records: group
                .records
                .iter()
                .filter(|record| range.contains(record))
                .cloned()
                .collect(),
            total_cases: group.total_cases,
            total_deaths: group.total_deaths,
        })
        .collect()
}

pub fn filter(groups: &[CountryGroup], range: DateRange, filters: &FilterState) -> Vec<DisplayRow> {
    filter_period(groups, range)
        .iter()
        .map(DisplayRow::from)
        .filter(|row| filters.matches(row))
        .collect()
}
