use std::collections::HashMap;

use serde::Serialize;
use tracing::instrument;

use super::{RawRecord, Record};

/// All records of one country, with totals taken over every record ever grouped.
///
/// The totals are computed once at ingestion. Narrowing `records` (see
/// [crate::view::filter_period]) leaves them untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryGroup {
    pub country: String,
    pub records: Vec<Record>,
    pub total_cases: i64,
    pub total_deaths: i64,
}

impl CountryGroup {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            records: Vec::new(),
            total_cases: 0,
            total_deaths: 0,
        }
    }

    pub fn push(&mut self, record: Record) {
        self.total_cases += record.cases;
        self.total_deaths += record.deaths;
        self.records.push(record);
    }
}

/// The grouped feed, in first-seen country order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub groups: Vec<CountryGroup>,
    /// Feed entries dropped because they had no country or no usable counts.
    pub skipped: usize,
}

impl Dataset {
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.country.as_str())
    }
}

#[instrument(skip_all)]
pub fn group_by_country(raw: impl IntoIterator<Item = RawRecord>) -> Dataset {
    let mut groups: Vec<CountryGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0;

    for raw in raw {
        let (country, record) = match Record::from_raw(raw) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("skipping malformed record: {}", err);
                skipped += 1;
                continue;
            }
        };

        let slot = *index.entry(country).or_insert_with_key(|country| {
            groups.push(CountryGroup::new(country.clone()));
            groups.len() - 1
        });

        groups[slot].push(record);
    }

    tracing::debug!(countries = groups.len(), skipped, "grouped feed records");

    Dataset { groups, skipped }
}
