use chrono::NaiveDate;
use snafu::Snafu;

/// The day format used by the feed's `dateRep` field.
pub const FEED_DATE_FORMAT: &str = "%d/%m/%Y";

/// A calendar day as reported by the feed, compared by day only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReportDate(NaiveDate);

impl ReportDate {
    pub fn new(day: NaiveDate) -> Self {
        Self(day)
    }

    pub fn day(self) -> NaiveDate {
        self.0
    }
}

impl std::str::FromStr for ReportDate {
    type Err = ParseReportDate;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(input.trim(), FEED_DATE_FORMAT)
            .map(ReportDate)
            .map_err(|_| ParseReportDate {
                text: input.to_string(),
            })
    }
}

impl std::fmt::Display for ReportDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(FEED_DATE_FORMAT))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("expected a DD/MM/YYYY date, got `{text}`"))]
pub struct ParseReportDate {
    pub text: String,
}
