use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use url::form_urlencoded;

use crate::view::{DateRange, FilterState, Metric, Pagination, DEFAULT_PAGE_SIZE};

/// Query string shared by the pages and the JSON endpoints.
///
/// Form inputs submit empty strings for untouched fields; those decode as absent.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewQuery {
    #[serde_as(as = "NoneAsEmptyString")]
    pub start: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    pub end: Option<NaiveDate>,
    #[serde_as(as = "NoneAsEmptyString")]
    pub metric: Option<Metric>,
    #[serde_as(as = "NoneAsEmptyString")]
    pub min: Option<f64>,
    #[serde_as(as = "NoneAsEmptyString")]
    pub max: Option<f64>,
    pub country: String,
    #[serde_as(as = "NoneAsEmptyString")]
    pub selected: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    pub page: Option<usize>,
    #[serde_as(as = "NoneAsEmptyString")]
    pub page_size: Option<usize>,
}

impl ViewQuery {
    pub fn date_range(&self, defaults: DateRange) -> DateRange {
        DateRange::new(
            self.start.unwrap_or(defaults.start),
            self.end.unwrap_or(defaults.end),
        )
    }

    pub fn filters(&self) -> FilterState {
        FilterState {
            metric: self.metric,
            min_value: self.min,
            max_value: self.max,
            country_searched: self.country.clone(),
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.page.unwrap_or(0),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    /// The same query with every filter cleared, keeping the date range.
    pub fn reset(&self) -> ViewQuery {
        ViewQuery {
            start: self.start,
            end: self.end,
            ..ViewQuery::default()
        }
    }

    pub fn with_page(&self, page: usize) -> ViewQuery {
        ViewQuery {
            page: Some(page),
            ..self.clone()
        }
    }

    /// Encode the fields that are set, for use in links.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());

        let mut pair = |key: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                serializer.append_pair(key, &value);
            }
        };

        pair("start", self.start.map(|d| d.to_string()));
        pair("end", self.end.map(|d| d.to_string()));
        pair("metric", self.metric.map(|m| m.to_string()));
        pair("min", self.min.map(|v| v.to_string()));
        pair("max", self.max.map(|v| v.to_string()));
        pair("country", Some(self.country.clone()));
        pair("selected", self.selected.clone());
        pair("page", self.page.map(|v| v.to_string()));
        pair("page_size", self.page_size.map(|v| v.to_string()));

        serializer.finish()
    }
}
