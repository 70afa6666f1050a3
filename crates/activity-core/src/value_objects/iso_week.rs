//! ISO-8601 week identifiers of the form `YYYY-Www`

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar week as defined by ISO-8601 (weeks start on Monday).
///
/// Ordering follows the calendar, and the string form sorts the same way,
/// which lets the database compare weeks as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoWeek {
    year: i32,
    week: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ISO week '{0}', expected YYYY-Www")]
pub struct IsoWeekError(pub String);

impl IsoWeek {
    /// Build a week, checking that it exists in the given ISO year
    pub fn new(year: i32, week: u32) -> Result<Self, IsoWeekError> {
        if !(1000..=9999).contains(&year)
            || NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).is_none()
        {
            return Err(IsoWeekError(format!("{year:04}-W{week:02}")));
        }
        Ok(Self { year, week })
    }

    pub fn parse(s: &str) -> Result<Self, IsoWeekError> {
        let invalid = || IsoWeekError(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 8 || bytes[4] != b'-' || bytes[5] != b'W' {
            return Err(invalid());
        }
        let digits = |range: std::ops::Range<usize>| {
            let part = &s[range];
            if part.bytes().all(|b| b.is_ascii_digit()) {
                part.parse::<u32>().ok()
            } else {
                None
            }
        };
        let year = digits(0..4).ok_or_else(invalid)?;
        let week = digits(6..8).ok_or_else(invalid)?;
        Self::new(year as i32, week).map_err(|_| invalid())
    }

    /// The ISO week containing `date`
    pub fn of_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    pub fn current() -> Self {
        Self::of_date(Utc::now().date_naive())
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.year
    }

    #[inline]
    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn monday(&self) -> NaiveDate {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn sunday(&self) -> NaiveDate {
        self.monday() + Duration::days(6)
    }

    /// Half-open UTC range `[monday 00:00, next monday 00:00)`
    pub fn utc_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = self.monday().and_time(chrono::NaiveTime::MIN);
        let start = Utc.from_utc_datetime(&start);
        (start, start + Duration::days(7))
    }
}

impl fmt::Display for IsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for IsoWeek {
    type Err = IsoWeekError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IsoWeek::parse(s)
    }
}

impl TryFrom<String> for IsoWeek {
    type Error = IsoWeekError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        IsoWeek::parse(&value)
    }
}

impl Serialize for IsoWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IsoWeek {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        IsoWeek::parse(&raw).map_err(serde::de::Error::custom)
    }
}
