//! Canonical `YYYY-MM-DD` identifiers for calendar days.
//!
//! A [`DateId`] is the identity every other part of the crate keys on. Its
//! string form sorts lexicographically in the same order as the days it names
//! (for years `0000` through `9999`), so range containment is a plain string
//! comparison.
//!
//! ```
//! use chrono::NaiveDate;
//! use daygrid::{DateId, from_date_id, to_date_id};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
//! let id = to_date_id(date);
//! assert_eq!(id.as_str(), "2024-02-29");
//! assert_eq!(from_date_id("2024-02-29").unwrap(), date);
//! assert!("2024-02-30".parse::<DateId>().is_err());
//! ```

use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::{
    date::{clamp_to_supported, start_of_month},
    error::DateIdError,
};

/// Identity of one calendar day, rendered as `YYYY-MM-DD`.
///
/// Equality, ordering and hashing use the string form only.
#[derive(Clone)]
pub struct DateId {
    text: String,
    date: NaiveDate,
}

impl DateId {
    /// Identifier for `date`.
    ///
    /// Days outside years `0000` through `9999` have no four-digit form; they
    /// are clamped to the nearest supported day first.
    pub fn from_date(date: NaiveDate) -> Self {
        let date = clamp_to_supported(date);
        let text = format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day());
        Self { text, date }
    }

    /// Identifier for the first day of the month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        Self::from_date(start_of_month(clamp_to_supported(date)))
    }

    /// The `YYYY-MM-DD` form.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The calendar day this id names.
    pub fn to_date(&self) -> NaiveDate {
        self.date
    }
}

impl fmt::Debug for DateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateId({})", self.text)
    }
}

impl fmt::Display for DateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for DateId {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for DateId {}

impl PartialOrd for DateId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

impl Hash for DateId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl AsRef<str> for DateId {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl Borrow<str> for DateId {
    fn borrow(&self) -> &str {
        &self.text
    }
}

impl FromStr for DateId {
    type Err = DateIdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let date = from_date_id(input)?;
        Ok(Self {
            text: input.to_owned(),
            date,
        })
    }
}

impl TryFrom<&str> for DateId {
    type Error = DateIdError;

    fn try_from(input: &str) -> Result<Self, Self::Error> {
        input.parse()
    }
}

impl From<NaiveDate> for DateId {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

/// Returns the identifier for `date`.
pub fn to_date_id(date: NaiveDate) -> DateId {
    DateId::from_date(date)
}

/// Returns the identifier for the wall-clock day of `date_time`.
///
/// The time component is dropped as-is; no timezone is consulted, so the id
/// always names the day the caller's local clock showed.
pub fn to_date_id_from_datetime(date_time: NaiveDateTime) -> DateId {
    DateId::from_date(date_time.date())
}

/// Parses a `YYYY-MM-DD` identifier into the day it names.
pub fn from_date_id(input: &str) -> Result<NaiveDate, DateIdError> {
    let malformed = || DateIdError::Malformed {
        input: input.to_owned(),
    };
    let bytes = input.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(malformed());
    }
    let digits = |range: std::ops::Range<usize>| -> Result<u32, DateIdError> {
        let part = &bytes[range];
        if !part.iter().all(u8::is_ascii_digit) {
            return Err(malformed());
        }
        Ok(part
            .iter()
            .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0')))
    };
    let year = digits(0..4)?;
    let month = digits(5..7)?;
    let day = digits(8..10)?;
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| DateIdError::OutOfRange {
        input: input.to_owned(),
    })
}
