use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};
use snafu::{OptionExt as _, Snafu};

use super::ReportDate;

/// One object of the feed's `records` array, as delivered.
///
/// Every field is optional so a single malformed entry cannot reject the whole payload;
/// [Record::from_raw] decides what is usable.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawRecord {
    #[serde(rename = "countriesAndTerritories", default)]
    pub country: Option<String>,
    #[serde(rename = "dateRep", default)]
    pub date: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub cases: Option<i64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub deaths: Option<i64>,
}

impl RawRecord {
    pub fn new(country: &str, date: &str, cases: i64, deaths: i64) -> Self {
        Self {
            country: Some(country.to_string()),
            date: Some(date.to_string()),
            cases: Some(cases),
            deaths: Some(deaths),
        }
    }
}

/// The envelope returned by the feed endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedPayload {
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

/// A single day of figures for one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// The date exactly as the feed wrote it.
    pub date: String,
    #[serde(skip)]
    pub day: Option<ReportDate>,
    pub cases: i64,
    pub deaths: i64,
}

impl Record {
    pub fn new(date: impl Into<String>, cases: i64, deaths: i64) -> Self {
        let date = date.into();
        let day = date.parse().ok();
        Self {
            date,
            day,
            cases,
            deaths,
        }
    }

    /// Split a raw feed entry into its country and record.
    ///
    /// A missing or unparsable date is kept; such records never fall inside a date range.
    pub fn from_raw(raw: RawRecord) -> Result<(String, Record), MalformedRecord> {
        let RawRecord {
            country,
            date,
            cases,
            deaths,
        } = raw;

        let country = country
            .filter(|name| !name.is_empty())
            .context(MissingCountrySnafu)?;
        let date = date.unwrap_or_default();
        let cases = cases.with_context(|| MissingCountSnafu {
            country: country.clone(),
            date: date.clone(),
            field: "cases",
        })?;
        let deaths = deaths.with_context(|| MissingCountSnafu {
            country: country.clone(),
            date: date.clone(),
            field: "deaths",
        })?;

        Ok((country, Record::new(date, cases, deaths)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum MalformedRecord {
    #[snafu(display("record has no country name"))]
    MissingCountry,

    #[snafu(display("record for `{country}` on `{date}` has no numeric `{field}`"))]
    MissingCount {
        country: String,
        date: String,
        field: &'static str,
    },
}
