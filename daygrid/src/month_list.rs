//! The ordered month sequence behind a scrolling calendar list.
//!
//! A [`MonthList`] is a persistent value: every operation returns a new list
//! and leaves the receiver untouched, sharing structure through
//! [`im::Vector`]. The months it holds are always contiguous, duplicate free
//! and normalized to the first of the month.

use chrono::NaiveDate;
use derive_setters::Setters;
use im::Vector;
use tracing::debug;

use crate::{
    date::{
        Clock, FirstDayOfWeek, add_months, difference_in_months, start_of_month, weeks_in_month,
    },
    date_id::DateId,
};

/// Months added per scroll-edge batch when the host does not say otherwise.
pub const DEFAULT_SCROLL_RANGE_IN_MONTHS: u32 = 12;

/// One entry of the month list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonth {
    /// Id of the first day of the month.
    pub id: DateId,
    /// First day of the month.
    pub date: NaiveDate,
    /// Week rows this month needs.
    pub number_of_weeks: u32,
}

impl CalendarMonth {
    /// The month containing `date`.
    pub fn new(date: NaiveDate, first_day_of_week: FirstDayOfWeek) -> Self {
        let date = start_of_month(date);
        Self {
            id: DateId::from_date(date),
            date,
            number_of_weeks: weeks_in_month(date, first_day_of_week),
        }
    }
}

/// Bounds and starting point of a [`MonthList`].
#[derive(Debug, Clone, Setters)]
pub struct MonthListArgs {
    /// Month to center the list on; today's month when unset.
    #[setters(strip_option)]
    pub initial_month_id: Option<DateId>,
    /// Months before the initial month to include up front.
    pub past_scroll_range_in_months: u32,
    /// Months after the initial month to include up front.
    pub future_scroll_range_in_months: u32,
    /// The list never extends before this day's month.
    #[setters(strip_option)]
    pub min_date_id: Option<DateId>,
    /// The list never extends past this day's month.
    #[setters(strip_option)]
    pub max_date_id: Option<DateId>,
    /// Used to size each month.
    pub first_day_of_week: FirstDayOfWeek,
}

impl Default for MonthListArgs {
    fn default() -> Self {
        Self {
            initial_month_id: None,
            past_scroll_range_in_months: DEFAULT_SCROLL_RANGE_IN_MONTHS,
            future_scroll_range_in_months: DEFAULT_SCROLL_RANGE_IN_MONTHS,
            min_date_id: None,
            max_date_id: None,
            first_day_of_week: FirstDayOfWeek::default(),
        }
    }
}

/// Contiguous months between `start` and `end` inclusive, empty when `end`
/// precedes `start`.
pub fn build_month_list(
    start: NaiveDate,
    end: NaiveDate,
    first_day_of_week: FirstDayOfWeek,
) -> Vector<CalendarMonth> {
    let start = start_of_month(start);
    let end = start_of_month(end);
    let count = difference_in_months(end, start);
    (0..=count)
        .map(|offset| CalendarMonth::new(add_months(start, offset), first_day_of_week))
        .collect()
}

/// Persistent, gap-free month sequence with optional bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthList {
    months: Vector<CalendarMonth>,
    min_month: Option<NaiveDate>,
    max_month: Option<NaiveDate>,
    first_day_of_week: FirstDayOfWeek,
}

impl MonthList {
    /// Builds the initial list from `args`, reading today from `clock` when no
    /// initial month is given.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn initialize(args: &MonthListArgs, clock: &dyn Clock) -> Self {
        let initial = start_of_month(
            args.initial_month_id
                .as_ref()
                .map_or_else(|| clock.today(), DateId::to_date),
        );
        let min_month = args.min_date_id.as_ref().map(|id| start_of_month(id.to_date()));
        let max_month = args.max_date_id.as_ref().map(|id| start_of_month(id.to_date()));

        let past = i32::try_from(args.past_scroll_range_in_months).unwrap_or(i32::MAX);
        let future = i32::try_from(args.future_scroll_range_in_months).unwrap_or(i32::MAX);
        let mut start = add_months(initial, -past);
        let mut end = add_months(initial, future);
        if let Some(min) = min_month
            && start < min
        {
            start = min;
        }
        if let Some(max) = max_month
            && end > max
        {
            end = max;
        }

        let months = build_month_list(start, end, args.first_day_of_week);
        debug!(
            initial = %DateId::from_date(initial),
            len = months.len(),
            "initialized month list"
        );
        Self {
            months,
            min_month,
            max_month,
            first_day_of_week: args.first_day_of_week,
        }
    }

    /// The months, oldest first.
    pub fn months(&self) -> &Vector<CalendarMonth> {
        &self.months
    }

    /// Number of months.
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Whether the list holds no months.
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Oldest month.
    pub fn first(&self) -> Option<&CalendarMonth> {
        self.months.front()
    }

    /// Newest month.
    pub fn last(&self) -> Option<&CalendarMonth> {
        self.months.back()
    }

    /// Weekday the months are sized for.
    pub fn first_day_of_week(&self) -> FirstDayOfWeek {
        self.first_day_of_week
    }

    /// Position of the month containing `id`.
    pub fn index_of(&self, id: &DateId) -> Option<usize> {
        let month_id = DateId::month_of(id.to_date());
        self.months
            .binary_search_by(|month| month.id.cmp(&month_id))
            .ok()
    }

    /// A list extended by up to `count` months after the current last one,
    /// stopping at the max bound.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn append(&self, count: u32) -> Self {
        let mut next = self.clone();
        let Some(last) = self.last() else {
            return next;
        };
        let mut end = start_of_month(add_months(
            last.date,
            i32::try_from(count).unwrap_or(i32::MAX),
        ));
        if let Some(max) = self.max_month
            && end > max
        {
            debug!(max = %DateId::from_date(max), "append clamped to max month");
            end = max;
        }
        if end > last.date {
            next.months
                .append(build_month_list(add_months(last.date, 1), end, self.first_day_of_week));
        }
        next
    }

    /// A list extended by up to `count` months before the current first one,
    /// stopping at the min bound.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn prepend(&self, count: u32) -> Self {
        let mut next = self.clone();
        let Some(first) = self.first() else {
            return next;
        };
        let mut start = add_months(first.date, -i32::try_from(count).unwrap_or(i32::MAX));
        if let Some(min) = self.min_month
            && start < min
        {
            debug!(min = %DateId::from_date(min), "prepend clamped to min month");
            start = min;
        }
        if start < first.date {
            let mut months =
                build_month_list(start, add_months(first.date, -1), self.first_day_of_week);
            months.append(next.months);
            next.months = months;
        }
        next
    }

    /// A list that reaches the month containing `target`, extending whichever
    /// end is needed. Bounds still apply, so the target may remain missing.
    pub fn add_missing_months(&self, target: &DateId) -> Self {
        let target_month = start_of_month(target.to_date());
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            let out_of_bounds = self.min_month.is_some_and(|min| target_month < min)
                || self.max_month.is_some_and(|max| target_month > max);
            let mut next = self.clone();
            if !out_of_bounds {
                next.months = build_month_list(target_month, target_month, self.first_day_of_week);
            }
            return next;
        };

        if target_month > last.date {
            let missing = difference_in_months(target_month, last.date);
            self.append(missing.unsigned_abs())
        } else if target_month < first.date {
            let missing = difference_in_months(first.date, target_month);
            self.prepend(missing.unsigned_abs())
        } else {
            self.clone()
        }
    }
}

/// Pixel metrics of one month in a list.
#[derive(Debug, Clone, Copy, PartialEq, Setters)]
pub struct HeightArgs {
    /// Month title row.
    pub calendar_month_header_height: f32,
    /// Weekday label row.
    pub calendar_week_header_height: f32,
    /// One week row.
    pub calendar_day_height: f32,
    /// Gap between the header rows and between week rows.
    pub calendar_row_vertical_spacing: f32,
    /// Extra height a host adds per month.
    pub calendar_additional_height: f32,
    /// Gap between consecutive months.
    pub calendar_spacing: f32,
}

impl Default for HeightArgs {
    fn default() -> Self {
        Self {
            calendar_month_header_height: 20.0,
            calendar_week_header_height: 20.0,
            calendar_day_height: 32.0,
            calendar_row_vertical_spacing: 8.0,
            calendar_additional_height: 0.0,
            calendar_spacing: 20.0,
        }
    }
}

/// Distance from a month's top edge to the top of week row `week_index`.
pub fn week_offset_in_month(week_index: u32, args: &HeightArgs) -> f32 {
    let spacing = args.calendar_row_vertical_spacing;
    args.calendar_month_header_height
        + spacing
        + args.calendar_week_header_height
        + spacing
        + week_index as f32 * (args.calendar_day_height + spacing)
}

/// Rendered height of `month`, including the gap to the next month.
///
/// The last week row carries no trailing row spacing.
pub fn height_for_month(month: &CalendarMonth, args: &HeightArgs) -> f32 {
    let weeks = month.number_of_weeks as f32;
    let spacing = args.calendar_row_vertical_spacing;
    let header = args.calendar_month_header_height + spacing + args.calendar_week_header_height;
    let rows = spacing + weeks * args.calendar_day_height + (weeks - 1.0).max(0.0) * spacing;
    header + rows + args.calendar_additional_height + args.calendar_spacing
}
