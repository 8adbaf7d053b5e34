//! Issue dates, record windows and timestamp formatting.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HydroError, HydroResult};

/// Timestamp rendering used by a result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    /// `YYYY-MM-DDTHH:MM:SS+00:00`, used by forecast paths.
    #[default]
    Forecast,
    /// `YYYY-MM-DDTHH:MM:SSZ`, used by record paths.
    Record,
}

impl TimeFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            TimeFormat::Forecast => "%Y-%m-%dT%H:%M:%S+00:00",
            TimeFormat::Record => "%Y-%m-%dT%H:%M:%SZ",
        }
    }

    pub fn format(&self, dt: &DateTime<Utc>) -> String {
        dt.format(self.pattern()).to_string()
    }
}

/// A resolved forecast issue: calendar date plus issue hour.
///
/// Stored on disk as a directory named `YYYYMMDD.HH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ForecastDate {
    date: NaiveDate,
    hour: u32,
}

impl ForecastDate {
    pub fn new(date: NaiveDate, hour: u32) -> HydroResult<Self> {
        if hour > 23 {
            return Err(HydroError::bad_request(format!(
                "Unrecognized forecast hour \"{:02}\"",
                hour
            )));
        }
        Ok(Self { date, hour })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// Directory name, e.g. `20210101.00`.
    pub fn directory_name(&self) -> String {
        format!("{}.{:02}", self.date.format("%Y%m%d"), self.hour)
    }

    /// Compact date token, e.g. `20210101`.
    pub fn compact(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    /// Parse a directory name of the form `YYYYMMDD.HH`.
    pub fn from_directory_name(name: &str) -> Option<Self> {
        let (date, hour) = name.split_once('.')?;
        let digits = |s: &str, n: usize| s.len() == n && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(date, 8) || !digits(hour, 2) {
            return None;
        }
        let date = NaiveDate::parse_from_str(date, "%Y%m%d").ok()?;
        let hour: u32 = hour.parse().ok()?;
        ForecastDate::new(date, hour).ok()
    }
}

impl fmt::Display for ForecastDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.directory_name())
    }
}

/// An issue date as requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueDate {
    /// Most recent issue found on disk.
    Latest,
    On(ForecastDate),
}

impl IssueDate {
    /// Parse `latest`, `YYYYMMDD` or `YYYYMMDD.HH`.
    pub fn parse(token: &str) -> HydroResult<Self> {
        let token = token.trim();
        if token.eq_ignore_ascii_case("latest") {
            return Ok(IssueDate::Latest);
        }
        if let Some(date) = ForecastDate::from_directory_name(token) {
            return Ok(IssueDate::On(date));
        }
        if token.len() == 8 {
            if let Ok(date) = NaiveDate::parse_from_str(token, "%Y%m%d") {
                return Ok(IssueDate::On(ForecastDate { date, hour: 0 }));
            }
        }
        Err(HydroError::bad_request(format!(
            "Unrecognized date \"{}\". Use YYYYMMDD format or \"latest\"",
            token
        )))
    }
}

impl fmt::Display for IssueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueDate::Latest => f.write_str("latest"),
            IssueDate::On(date) => date.fmt(f),
        }
    }
}

/// Inclusive window of record timestamps, midnight to midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Parse two `YYYYMMDD` tokens. Either failing names both literals.
    pub fn parse(start_date: &str, end_date: &str) -> HydroResult<Self> {
        let parse = |s: &str| {
            if s.len() != 8 {
                return None;
            }
            NaiveDate::parse_from_str(s, "%Y%m%d").ok()
        };
        match (parse(start_date), parse(end_date)) {
            (Some(start), Some(end)) => Ok(Self {
                start: midnight(start),
                end: midnight(end),
            }),
            _ => Err(HydroError::bad_request(format!(
                "Unrecognized start_date \"{}\" or end_date \"{}\". Use YYYYMMDD format",
                start_date, end_date
            ))),
        }
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        *dt >= self.start && *dt <= self.end
    }
}

/// Midnight UTC on the given date.
pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&NaiveDateTime::new(date, NaiveTime::MIN))
}

/// Convert unix seconds to a UTC timestamp.
pub fn from_unix_seconds(secs: i64) -> HydroResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| HydroError::data_integrity(format!("time value {} out of range", secs)))
}

/// Day-of-year key without the year, e.g. `03/14`.
pub fn day_key(dt: &DateTime<Utc>) -> String {
    dt.format("%m/%d").to_string()
}
