use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use snafu::ResultExt;
use url::Url;

use crate::error::{ApplicationError, ConfigLoadSnafu};
use crate::view::DateRange;

pub const ECDC_FEED: &str = "https://opendata.ecdc.europa.eu/covid19/casedistribution/json/";

/// First and last day the feed has data for.
pub const FEED_FIRST_DAY: NaiveDate = calendar_day(2019, 12, 31);
pub const FEED_LAST_DAY: NaiveDate = calendar_day(2020, 12, 14);

const fn calendar_day(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(day) => day,
        None => NaiveDate::MIN,
    }
}

#[serde_as]
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(rename = "host_address", default = "default_host")]
    pub host: SocketAddr,
    #[serde(default = "default_source_url")]
    pub source_url: Url,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: humantime::Duration,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,
    #[serde(default = "default_start_date")]
    pub default_start_date: NaiveDate,
    #[serde(default = "default_end_date")]
    pub default_end_date: NaiveDate,
}

impl Config {
    pub fn from_env() -> Result<Config, ApplicationError> {
        envy::from_env::<Config>().context(ConfigLoadSnafu)
    }

    pub fn default_range(&self) -> DateRange {
        DateRange::new(self.default_start_date, self.default_end_date)
    }
}

fn default_host() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_source_url() -> Url {
    Url::parse(ECDC_FEED).expect("ECDC_FEED is a valid url")
}

fn default_fetch_timeout() -> humantime::Duration {
    std::time::Duration::from_secs(60).into()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_start_date() -> NaiveDate {
    FEED_FIRST_DAY
}

fn default_end_date() -> NaiveDate {
    FEED_LAST_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config: Config = envy::from_iter(vars(&[])).unwrap();

        assert_eq!(config.host, default_host());
        assert_eq!(config.source_url.as_str(), ECDC_FEED);
        assert_eq!(*config.fetch_timeout, std::time::Duration::from_secs(60));
        assert_eq!(
            config.default_range(),
            DateRange::new(default_start_date(), default_end_date())
        );
    }

    #[test]
    fn feed_bounds_are_real_days() {
        assert_eq!(FEED_FIRST_DAY, NaiveDate::from_ymd_opt(2019, 12, 31).unwrap());
        assert_eq!(FEED_LAST_DAY, NaiveDate::from_ymd_opt(2020, 12, 14).unwrap());
    }

    #[test]
    fn ecdc_feed_constant_parses() {
        assert!(Url::parse(ECDC_FEED).is_ok());
    }

    #[test]
    fn read_overrides() {
        let config: Config = envy::from_iter(vars(&[
            ("HOST_ADDRESS", "0.0.0.0:8080"),
            ("SOURCE_URL", "http://localhost:9000/feed.json"),
            ("FETCH_TIMEOUT", "5s"),
            ("DEFAULT_START_DATE", "2020-03-01"),
        ]))
        .unwrap();

        assert_eq!(config.host.port(), 8080);
        assert_eq!(config.source_url.path(), "/feed.json");
        assert_eq!(*config.fetch_timeout, std::time::Duration::from_secs(5));
        assert_eq!(
            config.default_start_date,
            NaiveDate::from_ymd_opt(2020, 3, 1).unwrap()
        );
    }

    #[test]
    fn reject_malformed_timeout() {
        let result = envy::from_iter::<_, Config>(vars(&[("FETCH_TIMEOUT", "soon")]));
        assert!(result.is_err());
    }
}
