//! daygrid builds calendar month grids and keeps large lists of them cheap to
//! update.
//!
//! # Pieces
//!
//! - [`DateId`] and the helpers in [`date`]: `YYYY-MM-DD` identities and month
//!   and week arithmetic.
//! - [`resolve_day_state`]: what state a single day is in, given the active
//!   ranges, disabled days, bounds and today.
//! - [`build_calendar`]: a month laid out as week rows of seven fully resolved
//!   [`CalendarDayMetadata`] cells.
//! - [`MonthList`]: the gap-free month sequence behind a scrolling list, and
//!   [`height_for_month`] to size each entry.
//! - [`SelectionBroadcaster`]: instance-scoped fan-out that lets individual
//!   day cells react to selection changes without rebuilding every grid.
//!
//! Everything except the broadcaster is a pure function of its inputs. "Today"
//! is read through a [`Clock`] so results can be pinned.
//!
//! ```
//! use daygrid::{ActiveDateRange, BuildCalendarArgs, DayState, build_calendar};
//!
//! let range = ActiveDateRange::between(
//!     "2024-01-10".parse().unwrap(),
//!     "2024-01-12".parse().unwrap(),
//! );
//! let grid = build_calendar(
//!     &BuildCalendarArgs::new("2024-01-01".parse().unwrap())
//!         .calendar_active_date_ranges(vec![range])
//!         .today_id("2024-01-02".parse().unwrap()),
//! );
//! let active = grid.days().filter(|day| day.state == DayState::Active).count();
//! assert_eq!(active, 3);
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod broadcaster;
pub mod date;
pub mod date_id;
pub mod day_state;
pub mod error;
pub mod grid;
pub mod month_list;

pub use broadcaster::{
    ActiveRangesEvent, CalendarEvent, CalendarEventKind, InstanceId, SelectionBroadcaster,
    Subscription, SubscriptionId,
};
pub use date::{Clock, FirstDayOfWeek, FixedClock, SystemClock, today_id, week_of_month};
pub use date_id::{DateId, from_date_id, to_date_id, to_date_id_from_datetime};
pub use day_state::{
    ActiveDateRange, DayState, DayStateFields, DayStateInput, resolve_day_state,
    resolve_range_state,
};
pub use error::DateIdError;
pub use grid::{
    BuildCalendarArgs, CalendarDayMetadata, CalendarFormatters, DAYS_PER_WEEK, DEFAULT_LOCALE,
    DateFormatter, MonthGrid, WeekRow, build_calendar, build_calendar_with_clock,
};
pub use month_list::{
    CalendarMonth, DEFAULT_SCROLL_RANGE_IN_MONTHS, HeightArgs, MonthList, MonthListArgs,
    build_month_list, height_for_month, week_offset_in_month,
};

pub use chrono::NaiveDate;
