//! Month grid construction.
//!
//! [`build_calendar`] lays one month out as week rows of exactly seven
//! [`CalendarDayMetadata`] cells, padding the first and last rows with days
//! from the neighbouring months. Every cell, filler or not, goes through
//! [`resolve_day_state`].
//!
//! ```
//! use daygrid::{BuildCalendarArgs, FirstDayOfWeek, build_calendar};
//!
//! let args = BuildCalendarArgs::new("2024-02-01".parse().unwrap())
//!     .calendar_first_day_of_week(FirstDayOfWeek::Sunday)
//!     .today_id("2024-02-14".parse().unwrap());
//! let grid = build_calendar(&args);
//! assert_eq!(grid.weeks_list.len(), 5);
//! assert_eq!(grid.weeks_list[0][0].id.as_str(), "2024-01-28");
//! assert_eq!(grid.calendar_row_month, "February 2024");
//! ```

use std::{array, fmt, sync::Arc};

use chrono::{Datelike, NaiveDate, Weekday};
use derive_setters::Setters;
use tracing::debug;

use crate::{
    date::{
        Clock, FirstDayOfWeek, SystemClock, add_days, is_weekend, leading_filler_days,
        start_of_month, start_of_week, today_id, weeks_in_month,
    },
    date_id::DateId,
    day_state::{ActiveDateRange, DayState, DayStateFields, DayStateInput, resolve_day_state},
};

/// Days per grid row.
pub const DAYS_PER_WEEK: usize = 7;

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Turns a date and a locale tag into a label.
pub type DateFormatter = Arc<dyn Fn(NaiveDate, &str) -> String + Send + Sync>;

/// Label producers for the month header, day cells and weekday header.
///
/// The defaults render English labels and ignore the locale tag; hosts that
/// need localized output supply their own.
#[derive(Clone)]
pub struct CalendarFormatters {
    /// Month header, e.g. `February 2024`.
    pub month: DateFormatter,
    /// Day cell label, e.g. `9`.
    pub day: DateFormatter,
    /// Weekday header label, e.g. `S`.
    pub weekday: DateFormatter,
}

impl Default for CalendarFormatters {
    fn default() -> Self {
        Self {
            month: Arc::new(|date, _| format!("{} {}", month_name(date.month()), date.year())),
            day: Arc::new(|date, _| date.day().to_string()),
            weekday: Arc::new(|date, _| weekday_narrow_label(date.weekday()).to_owned()),
        }
    }
}

impl fmt::Debug for CalendarFormatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarFormatters").finish_non_exhaustive()
    }
}

/// Everything a renderer needs to paint one day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDayMetadata {
    /// The day.
    pub date: NaiveDate,
    /// The day's identity.
    pub id: DateId,
    /// The day belongs to a neighbouring month.
    pub is_different_month: bool,
    /// First day of its own month.
    pub is_start_of_month: bool,
    /// Last day of its own month.
    pub is_end_of_month: bool,
    /// First cell of its row.
    pub is_start_of_week: bool,
    /// Last cell of its row.
    pub is_end_of_week: bool,
    /// Saturday or Sunday.
    pub is_weekend: bool,
    /// Disabled by id, min or max.
    pub is_disabled: bool,
    /// The day is today.
    pub is_today: bool,
    /// Start of the range covering this day.
    pub is_start_of_range: bool,
    /// End of the range covering this day.
    pub is_end_of_range: bool,
    /// The covering range has both ends.
    pub is_range_valid: bool,
    /// Resolved visual state.
    pub state: DayState,
    /// Formatted day label.
    pub display_label: String,
}

impl CalendarDayMetadata {
    /// The state-affecting fields of this cell.
    pub fn state_fields(&self) -> DayStateFields {
        DayStateFields {
            state: self.state,
            is_disabled: self.is_disabled,
            is_today: self.is_today,
            is_start_of_range: self.is_start_of_range,
            is_end_of_range: self.is_end_of_range,
            is_range_valid: self.is_range_valid,
        }
    }

    /// Overwrites the state and range flags with `fields`.
    ///
    /// `is_disabled` and `is_today` are left alone: they come from the full
    /// build and range updates never change them.
    pub fn apply_range_fields(&mut self, fields: &DayStateFields) {
        self.state = fields.state;
        self.is_start_of_range = fields.is_start_of_range;
        self.is_end_of_range = fields.is_end_of_range;
        self.is_range_valid = fields.is_range_valid;
    }
}

/// One row of the grid.
pub type WeekRow = [CalendarDayMetadata; DAYS_PER_WEEK];

/// A fully laid out month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// Four to six rows of seven days.
    pub weeks_list: Vec<WeekRow>,
    /// Month header label.
    pub calendar_row_month: String,
    /// Weekday header labels, starting at the configured first day of week.
    pub week_days_list: [String; DAYS_PER_WEEK],
}

impl MonthGrid {
    /// Every cell in row order.
    pub fn days(&self) -> impl Iterator<Item = &CalendarDayMetadata> {
        self.weeks_list.iter().flatten()
    }

    /// The cell for `id`, if the grid shows it.
    pub fn day(&self, id: &DateId) -> Option<&CalendarDayMetadata> {
        self.days().find(|day| &day.id == id)
    }

    /// Number of week rows.
    pub fn number_of_weeks(&self) -> usize {
        self.weeks_list.len()
    }
}

/// Configuration for [`build_calendar`].
#[derive(Debug, Clone, Setters)]
pub struct BuildCalendarArgs {
    /// Any day of the month to lay out.
    pub calendar_month_id: DateId,
    /// Weekday each row starts on.
    pub calendar_first_day_of_week: FirstDayOfWeek,
    /// Highlighted ranges.
    pub calendar_active_date_ranges: Vec<ActiveDateRange>,
    /// Days that cannot be selected.
    pub calendar_disabled_date_ids: Vec<DateId>,
    /// Days before this are disabled.
    #[setters(strip_option)]
    pub calendar_min_date_id: Option<DateId>,
    /// Days after this are disabled.
    #[setters(strip_option)]
    pub calendar_max_date_id: Option<DateId>,
    /// Locale tag handed to the formatters.
    #[setters(into)]
    pub calendar_format_locale: String,
    /// Label producers.
    pub formatters: CalendarFormatters,
    /// Pins today's id; the clock is consulted when unset.
    #[setters(strip_option)]
    pub today_id: Option<DateId>,
}

impl BuildCalendarArgs {
    /// Arguments for the month containing `calendar_month_id` with defaults
    /// everywhere else.
    pub fn new(calendar_month_id: DateId) -> Self {
        Self {
            calendar_month_id,
            calendar_first_day_of_week: FirstDayOfWeek::default(),
            calendar_active_date_ranges: Vec::new(),
            calendar_disabled_date_ids: Vec::new(),
            calendar_min_date_id: None,
            calendar_max_date_id: None,
            calendar_format_locale: DEFAULT_LOCALE.to_owned(),
            formatters: CalendarFormatters::default(),
            today_id: None,
        }
    }
}

/// Builds the grid for `args`, reading today from the system clock when
/// `args.today_id` is unset.
pub fn build_calendar(args: &BuildCalendarArgs) -> MonthGrid {
    build_calendar_with_clock(args, &SystemClock)
}

/// Builds the grid for `args`, reading today from `clock` when
/// `args.today_id` is unset.
#[tracing::instrument(level = "trace", skip_all, fields(month = %args.calendar_month_id))]
pub fn build_calendar_with_clock(args: &BuildCalendarArgs, clock: &dyn Clock) -> MonthGrid {
    let month_start = start_of_month(args.calendar_month_id.to_date());
    let first_day = args.calendar_first_day_of_week;
    let locale = args.calendar_format_locale.as_str();
    let today = args.today_id.clone().unwrap_or_else(|| today_id(clock));

    for range in args
        .calendar_active_date_ranges
        .iter()
        .filter(|range| range.is_inverted())
    {
        debug!(?range, "inverted active range covers no days");
    }

    let leading = leading_filler_days(month_start, first_day);
    let grid_start = add_days(month_start, -i64::from(leading));
    let rows = weeks_in_month(month_start, first_day) as usize;

    let weeks_list = (0..rows)
        .map(|row| {
            array::from_fn(|column| {
                let offset = (row * DAYS_PER_WEEK + column) as i64;
                let date = add_days(grid_start, offset);
                day_metadata(date, column, month_start, &today, args)
            })
        })
        .collect();

    let header_start = start_of_week(month_start, first_day);
    let week_days_list = array::from_fn(|index| {
        (args.formatters.weekday)(add_days(header_start, index as i64), locale)
    });

    MonthGrid {
        weeks_list,
        calendar_row_month: (args.formatters.month)(month_start, locale),
        week_days_list,
    }
}

fn day_metadata(
    date: NaiveDate,
    column: usize,
    month_start: NaiveDate,
    today: &DateId,
    args: &BuildCalendarArgs,
) -> CalendarDayMetadata {
    let id = DateId::from_date(date);
    let fields = resolve_day_state(&DayStateInput {
        id: &id,
        today_id: Some(today),
        active_date_ranges: &args.calendar_active_date_ranges,
        disabled_date_ids: &args.calendar_disabled_date_ids,
        min_date_id: args.calendar_min_date_id.as_ref(),
        max_date_id: args.calendar_max_date_id.as_ref(),
    });

    CalendarDayMetadata {
        date,
        is_different_month: date.year() != month_start.year()
            || date.month() != month_start.month(),
        is_start_of_month: date.day() == 1,
        is_end_of_month: date.succ_opt().is_none_or(|next| next.day() == 1),
        is_start_of_week: column == 0,
        is_end_of_week: column == DAYS_PER_WEEK - 1,
        is_weekend: is_weekend(date),
        is_disabled: fields.is_disabled,
        is_today: fields.is_today,
        is_start_of_range: fields.is_start_of_range,
        is_end_of_range: fields.is_end_of_range,
        is_range_valid: fields.is_range_valid,
        state: fields.state,
        display_label: (args.formatters.day)(date, &args.calendar_format_locale),
        id,
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

fn weekday_narrow_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "M",
        Weekday::Tue | Weekday::Thu => "T",
        Weekday::Wed => "W",
        Weekday::Fri => "F",
        Weekday::Sat | Weekday::Sun => "S",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::FixedClock;

    fn id(text: &str) -> DateId {
        text.parse().unwrap()
    }

    fn args(month: &str) -> BuildCalendarArgs {
        BuildCalendarArgs::new(id(month)).today_id(id("1999-01-01"))
    }

    #[test]
    fn february_2024_sunday_first() {
        let grid = build_calendar(&args("2024-02-01"));
        assert_eq!(grid.number_of_weeks(), 5);

        let first = &grid.weeks_list[0][0];
        assert_eq!(first.id.as_str(), "2024-01-28");
        assert!(first.is_different_month);
        assert!(first.is_start_of_week);

        let last = &grid.weeks_list[4][6];
        assert_eq!(last.id.as_str(), "2024-03-02");
        assert!(last.is_different_month);
        assert!(last.is_end_of_week);

        let leap_day = grid.day(&id("2024-02-29")).unwrap();
        assert!(leap_day.is_end_of_month);
        assert!(!leap_day.is_different_month);
        assert_eq!(leap_day.display_label, "29");
    }

    #[test]
    fn monday_first_shifts_rows_and_headers() {
        let grid = build_calendar(
            &args("2024-02-15").calendar_first_day_of_week(FirstDayOfWeek::Monday),
        );
        assert_eq!(grid.weeks_list[0][0].id.as_str(), "2024-01-29");
        assert_eq!(grid.week_days_list, ["M", "T", "W", "T", "F", "S", "S"]);
        assert_eq!(grid.calendar_row_month, "February 2024");
    }

    #[test]
    fn every_month_has_full_rows() {
        for year in [1900, 2000, 2023, 2024] {
            for month in 1..=12 {
                for first_day in [FirstDayOfWeek::Sunday, FirstDayOfWeek::Monday] {
                    let start = DateId::from_date(NaiveDate::from_ymd_opt(year, month, 1).unwrap());
                    let grid =
                        build_calendar(&args(start.as_str()).calendar_first_day_of_week(first_day));
                    assert!((4..=6).contains(&grid.number_of_weeks()));
                    assert_eq!(grid.week_days_list.len(), DAYS_PER_WEEK);
                    let days: Vec<_> = grid.days().collect();
                    assert_eq!(days.len(), grid.number_of_weeks() * DAYS_PER_WEEK);
                    for pair in days.windows(2) {
                        assert_eq!(add_days(pair[0].date, 1), pair[1].date);
                    }
                    assert_eq!(
                        Some(days.iter().filter(|day| !day.is_different_month).count() as u32),
                        crate::date::days_in_month(year, month)
                    );
                }
            }
        }
    }

    #[test]
    fn four_row_month() {
        let grid = build_calendar(&args("2015-02-01"));
        assert_eq!(grid.number_of_weeks(), 4);
        assert!(grid.days().all(|day| !day.is_different_month));
    }

    #[test]
    fn min_date_disables_earlier_days() {
        let grid = build_calendar(&args("2024-01-01").calendar_min_date_id(id("2024-01-10")));
        let min = id("2024-01-10");
        for day in grid.days() {
            if day.id < min {
                assert_eq!(day.state, DayState::Disabled, "{}", day.id);
            } else {
                assert_eq!(day.state, DayState::Idle, "{}", day.id);
            }
        }
    }

    #[test]
    fn active_range_overrides_disabled() {
        let grid = build_calendar(
            &args("2024-01-01")
                .calendar_active_date_ranges(vec![ActiveDateRange::between(
                    id("2024-01-10"),
                    id("2024-01-10"),
                )])
                .calendar_disabled_date_ids(vec![id("2024-01-10")]),
        );
        let day = grid.day(&id("2024-01-10")).unwrap();
        assert_eq!(day.state, DayState::Active);
        assert!(day.is_start_of_range);
        assert!(day.is_end_of_range);
        assert!(day.is_disabled);
    }

    #[test]
    fn filler_days_resolve_state() {
        let grid = build_calendar(&args("2024-02-01").calendar_active_date_ranges(vec![
            ActiveDateRange::between(id("2024-01-25"), id("2024-02-02")),
        ]));
        let filler = grid.day(&id("2024-01-29")).unwrap();
        assert!(filler.is_different_month);
        assert_eq!(filler.state, DayState::Active);
    }

    #[test]
    fn today_comes_from_clock_when_unpinned() {
        let args = BuildCalendarArgs::new(id("2024-02-01"));
        let grid = build_calendar_with_clock(&args, &FixedClock(id("2024-02-14").to_date()));
        let today: Vec<_> = grid.days().filter(|day| day.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].state, DayState::Today);
        assert_eq!(today[0].id.as_str(), "2024-02-14");
    }

    #[test]
    fn identical_inputs_build_identical_grids() {
        let args = args("2024-07-01")
            .calendar_active_date_ranges(vec![ActiveDateRange::starting_at(id("2024-07-04"))]);
        assert_eq!(build_calendar(&args), build_calendar(&args));
    }

    #[test]
    fn custom_formatters_receive_locale() {
        let formatters = CalendarFormatters {
            month: Arc::new(|date, locale| format!("{locale}:{}", date.month())),
            day: Arc::new(|date, _| format!("{:02}", date.day())),
            ..CalendarFormatters::default()
        };
        let grid = build_calendar(
            &args("2024-03-01")
                .calendar_format_locale("fr-FR")
                .formatters(formatters),
        );
        assert_eq!(grid.calendar_row_month, "fr-FR:3");
        assert_eq!(grid.weeks_list[0][5].display_label, "01");
    }
}
