//! Calendar date handling
//!
//! This module provides timezone-free calendar types:
//! - `CalendarDate`: a year/month/day triple rendered as `YYYY-MM-DD`
//! - `MonthOfYear`: a calendar month used for month arithmetic and filtering
//! - `DateRange`: an inclusive span of calendar dates
//! - `Timezone`: converts instants into the calendar day a user perceives
//!
//! Date-time inputs are reduced to the calendar fields as authored. A value
//! written as `2024-11-29T23:30:00-03:00` is the 29th, whatever the offset of
//! the machine doing the parsing.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors related to calendar operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid date {input:?}: {reason}")]
    InvalidDate {
        input: String,
        reason: String,
    },

    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Date out of supported range: {0}")]
    OutOfRange(String),
}

impl TemporalError {
    fn invalid(input: &str, reason: impl Into<String>) -> Self {
        TemporalError::InvalidDate {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// A date without time-of-day or timezone
///
/// Canonical text form is `YYYY-MM-DD`, which is also the serde representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Creates a date from its components
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, TemporalError> {
        let label = format!("{:04}-{:02}-{:02}", year, month, day);
        if !(1..=12).contains(&month) {
            return Err(TemporalError::invalid(&label, format!("month {} is out of range", month)));
        }
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                TemporalError::invalid(
                    &label,
                    format!("day {} does not exist in {:04}-{:02}", day, year, month),
                )
            })
    }

    /// Parses a date-like string into its calendar day
    ///
    /// Accepted shapes:
    /// - `YYYY-MM-DD`
    /// - RFC 3339 date-times (`2024-11-29T23:30:00-03:00`, `...Z`)
    /// - naive ISO date-times (`2024-11-29T23:30:00`, optional fraction,
    ///   `T` or space separator)
    pub fn parse(input: &str) -> Result<Self, TemporalError> {
        let trimmed = input.trim();
        if trimmed.len() < 10 || !trimmed.is_char_boundary(10) {
            return Err(TemporalError::invalid(trimmed, "expected YYYY-MM-DD"));
        }

        let (date_part, rest) = trimmed.split_at(10);
        let date = parse_date_part(date_part)?;

        if rest.is_empty() {
            return Ok(date);
        }

        if !rest.starts_with('T') && !rest.starts_with(' ') {
            return Err(TemporalError::invalid(trimmed, "unexpected text after date"));
        }

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::from_datetime(&with_offset));
        }

        const NAIVE_FORMATS: [&str; 4] = [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M",
        ];
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(|naive| Self(naive.date()))
            .ok_or_else(|| TemporalError::invalid(trimmed, "invalid time of day"))
    }

    /// Takes the calendar fields of a date-time in its own offset
    pub fn from_datetime<Z: TimeZone>(value: &DateTime<Z>) -> Self {
        Self(value.date_naive())
    }

    /// Returns the underlying chrono date
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the calendar month this date falls in
    pub fn month_of_year(&self) -> MonthOfYear {
        MonthOfYear {
            year: self.0.year(),
            month: self.0.month(),
        }
    }
}

/// Validates the `YYYY-MM-DD` shape before handing the fields to chrono
fn parse_date_part(part: &str) -> Result<CalendarDate, TemporalError> {
    let bytes = part.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return Err(TemporalError::invalid(part, "expected YYYY-MM-DD"));
    }

    let field = |range: std::ops::Range<usize>| -> Result<u32, TemporalError> {
        part[range]
            .parse::<u32>()
            .map_err(|_| TemporalError::invalid(part, "non-numeric date component"))
    };
    let year = field(0..4)? as i32;
    let month = field(5..7)?;
    let day = field(8..10)?;

    CalendarDate::new(year, month, day).map_err(|e| match e {
        TemporalError::InvalidDate { reason, .. } => TemporalError::invalid(part, reason),
        other => other,
    })
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.0
    }
}

impl FromStr for CalendarDate {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CalendarDate::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A calendar month (year + month number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthOfYear {
    year: i32,
    month: u32,
}

impl MonthOfYear {
    /// Creates a month, validating `month` is within 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self, TemporalError> {
        if !(1..=12).contains(&month) {
            return Err(TemporalError::invalid(
                &format!("{:04}-{:02}", year, month),
                format!("month {} is out of range", month),
            ));
        }
        let candidate = Self { year, month };
        candidate.first_day()?;
        Ok(candidate)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the month `months` calendar months later
    pub fn add_months(&self, months: u32) -> Result<Self, TemporalError> {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(months);
        let year = i32::try_from(index.div_euclid(12))
            .map_err(|_| TemporalError::OutOfRange(format!("{} + {} months", self, months)))?;
        let month = index.rem_euclid(12) as u32 + 1;
        let next = Self { year, month };
        next.first_day()
            .map_err(|_| TemporalError::OutOfRange(format!("{} + {} months", self, months)))?;
        Ok(next)
    }

    /// First day of the month
    pub fn first_day(&self) -> Result<CalendarDate, TemporalError> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(CalendarDate)
            .ok_or_else(|| TemporalError::OutOfRange(self.to_string()))
    }

    /// Last day of the month
    pub fn last_day(&self) -> Result<CalendarDate, TemporalError> {
        let next = self.add_months(1)?.first_day()?;
        next.0
            .pred_opt()
            .map(CalendarDate)
            .ok_or_else(|| TemporalError::OutOfRange(self.to_string()))
    }

    /// Every day of the month as an inclusive range
    pub fn date_range(&self) -> Result<DateRange, TemporalError> {
        DateRange::new(self.first_day()?, self.last_day()?)
    }

    /// Day `day` of this month with overflow carry
    ///
    /// Days past the end of the month roll into the following month the way
    /// adding `day - 1` days to the 1st does: day 31 of April is May 1st.
    /// Day 0 is one day before the 1st.
    pub fn day_with_overflow(&self, day: u32) -> Result<CalendarDate, TemporalError> {
        let first = self.first_day()?.0;
        let shifted = if day == 0 {
            first.checked_sub_days(Days::new(1))
        } else {
            first.checked_add_days(Days::new(u64::from(day - 1)))
        };
        shifted
            .map(CalendarDate)
            .ok_or_else(|| TemporalError::OutOfRange(format!("{} day {}", self, day)))
    }
}

impl fmt::Display for MonthOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

impl DateRange {
    pub fn new(start: CalendarDate, end: CalendarDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days between start and end (0 for a single-day range)
    pub fn days(&self) -> i64 {
        (self.end.0 - self.start.0).num_days()
    }
}

/// Timezone wrapper for user locales
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Timezone::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl FromStr for Timezone {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tz::from_str(s)
            .map(Timezone)
            .map_err(|_| TemporalError::OutOfRange(format!("unknown timezone {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Converts a UTC instant to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// The calendar day a user in this timezone perceives at `utc`
    pub fn calendar_date(&self, utc: DateTime<Utc>) -> CalendarDate {
        CalendarDate::from_datetime(&self.to_local(utc))
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::America::Sao_Paulo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let date = CalendarDate::parse("2024-11-29").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 11, 29));
        assert_eq!(date.to_string(), "2024-11-29");
    }

    #[test]
    fn test_parse_keeps_authored_day() {
        let late_evening = CalendarDate::parse("2024-11-29T23:30:00-03:00").unwrap();
        assert_eq!(late_evening.to_string(), "2024-11-29");

        let naive = CalendarDate::parse("2024-09-23T14:15:00.865").unwrap();
        assert_eq!(naive.to_string(), "2024-09-23");
    }

    #[test]
    fn test_parse_rejects_out_of_range_fields() {
        assert!(CalendarDate::parse("2024-13-01").is_err());
        assert!(CalendarDate::parse("2024-02-30").is_err());
        assert!(CalendarDate::parse("2024-13-40").is_err());
        assert!(CalendarDate::parse("2024-1-05").is_err());
        assert!(CalendarDate::parse("20x4-01-05").is_err());
    }

    #[test]
    fn test_day_with_overflow_carries() {
        let april = MonthOfYear::new(2024, 4).unwrap();
        assert_eq!(april.day_with_overflow(31).unwrap().to_string(), "2024-05-01");
        assert_eq!(april.day_with_overflow(30).unwrap().to_string(), "2024-04-30");
    }

    #[test]
    fn test_add_months_crosses_year() {
        let nov = MonthOfYear::new(2024, 11).unwrap();
        assert_eq!(nov.add_months(2).unwrap().to_string(), "2025-01");
        assert_eq!(nov.add_months(14).unwrap().to_string(), "2026-01");
    }
}
