//! Month and week arithmetic over [`NaiveDate`].
//!
//! Every function here stays inside the days a [`DateId`] can name, years
//! `0000` through `9999`. Results that would leave that span saturate at
//! [`first_supported_date`] or [`last_supported_date`] instead of panicking or
//! producing ids that no longer sort chronologically.

use chrono::{Datelike, Days, Local, Months, NaiveDate, TimeDelta, Weekday};

use crate::date_id::DateId;

/// The weekday a calendar row starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FirstDayOfWeek {
    /// Rows run Sunday through Saturday.
    #[default]
    Sunday,
    /// Rows run Monday through Sunday.
    Monday,
}

impl FirstDayOfWeek {
    /// The chrono weekday this variant names.
    pub fn weekday(self) -> Weekday {
        match self {
            FirstDayOfWeek::Sunday => Weekday::Sun,
            FirstDayOfWeek::Monday => Weekday::Mon,
        }
    }

    /// Days between the start of the row and `weekday` (0-6).
    pub fn offset_of(self, weekday: Weekday) -> u32 {
        match self {
            FirstDayOfWeek::Sunday => weekday.num_days_from_sunday(),
            FirstDayOfWeek::Monday => weekday.num_days_from_monday(),
        }
    }
}

/// Source of the current local date.
pub trait Clock: Send + Sync {
    /// The local wall-clock date right now.
    fn today(&self) -> NaiveDate;
}

/// Reads the operating system's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Identifier of `clock`'s current day.
pub fn today_id(clock: &dyn Clock) -> DateId {
    DateId::from_date(clock.today())
}

/// Earliest year a [`DateId`] can name.
pub const MIN_SUPPORTED_YEAR: i32 = 0;
/// Latest year a [`DateId`] can name.
pub const MAX_SUPPORTED_YEAR: i32 = 9999;

/// `0000-01-01`.
pub fn first_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(MIN_SUPPORTED_YEAR, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// `9999-12-31`.
pub fn last_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(MAX_SUPPORTED_YEAR, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// `date`, moved to the nearest supported day when it falls outside years
/// `0000` through `9999`.
pub fn clamp_to_supported(date: NaiveDate) -> NaiveDate {
    date.clamp(first_supported_date(), last_supported_date())
}

/// Whether `year` has a February 29th.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Number of days in `month` of `year`, `None` when `month` is not 1-12.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|first| end_of_month(first).day())
}

/// First day of the month containing `date`.
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Last day of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// The day a `first`-aligned week containing `date` starts on.
pub fn start_of_week(date: NaiveDate, first: FirstDayOfWeek) -> NaiveDate {
    let offset = first.offset_of(date.weekday());
    add_days(date, -i64::from(offset))
}

/// The day a `first`-aligned week containing `date` ends on.
pub fn end_of_week(date: NaiveDate, first: FirstDayOfWeek) -> NaiveDate {
    add_days(start_of_week(date, first), 6)
}

/// Moves `date` by `days`, which may be negative.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .map_or_else(|| saturation_bound(days < 0), clamp_to_supported)
}

/// Moves `date` back by `days`.
pub fn sub_days(date: NaiveDate, days: i64) -> NaiveDate {
    add_days(date, days.saturating_neg())
}

/// Moves `date` by `months`, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let moved = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    moved.map_or_else(|| saturation_bound(months < 0), clamp_to_supported)
}

fn saturation_bound(backwards: bool) -> NaiveDate {
    if backwards {
        first_supported_date()
    } else {
        last_supported_date()
    }
}

/// Moves `date` back by `months`.
pub fn sub_months(date: NaiveDate, months: i32) -> NaiveDate {
    add_months(date, months.saturating_neg())
}

/// Calendar months from `earlier` to `later`, ignoring the day of month.
pub fn difference_in_months(later: NaiveDate, earlier: NaiveDate) -> i32 {
    let years = later.year() - earlier.year();
    let months = later.month() as i32 - earlier.month() as i32;
    years * 12 + months
}

/// Whether `date` falls on a Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Filler days needed before the first of `date`'s month in a `first`-aligned grid.
pub fn leading_filler_days(date: NaiveDate, first: FirstDayOfWeek) -> u32 {
    first.offset_of(start_of_month(date).weekday())
}

/// Number of week rows the month containing `date` spans (4-6).
pub fn weeks_in_month(date: NaiveDate, first: FirstDayOfWeek) -> u32 {
    let cells = leading_filler_days(date, first) + end_of_month(date).day();
    cells.div_ceil(7)
}

/// Zero-based row index of `date` within its month's grid.
pub fn week_of_month(date: NaiveDate, first: FirstDayOfWeek) -> u32 {
    (leading_filler_days(date, first) + date.day0()) / 7
}
