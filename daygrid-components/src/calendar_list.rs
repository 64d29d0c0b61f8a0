//! A vertically scrolling list of months.
//!
//! ## Usage
//!
//! Create one [`CalendarListController`] per list. Feed scroll-edge events to
//! [`CalendarListController::on_end_reached`] and
//! [`CalendarListController::on_start_reached`], size list items with
//! [`CalendarListController::month_heights`], and mount visible months with
//! [`CalendarListController::mount_month`]. Selection changes go through
//! [`CalendarListController::set_active_date_ranges`], which reaches only the
//! mounted cells of this list.

use daygrid::{
    ActiveDateRange, BuildCalendarArgs, CalendarDayMetadata, CalendarFormatters, CalendarMonth,
    Clock, DEFAULT_LOCALE, DateId, HeightArgs, InstanceId, MonthGrid, MonthList, MonthListArgs,
    SelectionBroadcaster, build_calendar, height_for_month, today_id, week_of_month,
    week_offset_in_month,
};
use derive_setters::Setters;
use tracing::debug;

use crate::day_cell::DayCell;

/// Arguments for [`CalendarListController`].
#[derive(Debug, Clone, Setters)]
pub struct CalendarListArgs {
    /// Initial month, scroll ranges and bounds. The scroll ranges double as
    /// the batch sizes for edge extension.
    pub month_list: MonthListArgs,
    /// Pixel metrics used for item sizes and scroll offsets.
    pub heights: HeightArgs,
    /// Selection channel of this list; the shared default when unset.
    #[setters(strip_option)]
    pub instance_id: Option<InstanceId>,
    /// Ranges highlighted from the start.
    pub calendar_active_date_ranges: Vec<ActiveDateRange>,
    /// Days that cannot be selected.
    pub calendar_disabled_date_ids: Vec<DateId>,
    /// Locale tag handed to the formatters.
    #[setters(into)]
    pub calendar_format_locale: String,
    /// Label producers.
    pub formatters: CalendarFormatters,
    /// Pins today's id; the clock is consulted when unset.
    #[setters(strip_option)]
    pub today_id: Option<DateId>,
}

impl Default for CalendarListArgs {
    fn default() -> Self {
        Self {
            month_list: MonthListArgs::default(),
            heights: HeightArgs::default(),
            instance_id: None,
            calendar_active_date_ranges: Vec::new(),
            calendar_disabled_date_ids: Vec::new(),
            calendar_format_locale: DEFAULT_LOCALE.to_owned(),
            formatters: CalendarFormatters::default(),
            today_id: None,
        }
    }
}

/// A month mounted as live day cells.
pub struct MountedMonth {
    /// The month.
    pub month: CalendarMonth,
    /// Month header label.
    pub calendar_row_month: String,
    /// Weekday header labels.
    pub week_days_list: [String; 7],
    /// Live cells, one row per week.
    pub weeks: Vec<[DayCell; 7]>,
}

impl MountedMonth {
    /// The cells' current metadata as a plain grid.
    pub fn snapshot(&self) -> MonthGrid {
        MonthGrid {
            weeks_list: self
                .weeks
                .iter()
                .map(|row| std::array::from_fn(|column| row[column].metadata()))
                .collect(),
            calendar_row_month: self.calendar_row_month.clone(),
            week_days_list: self.week_days_list.clone(),
        }
    }

    /// The live cell for `id`, if this month shows it.
    pub fn cell(&self, id: &DateId) -> Option<&DayCell> {
        self.weeks
            .iter()
            .flatten()
            .find(|cell| cell.with_metadata(|day| &day.id == id))
    }
}

/// State behind a scrolling calendar list.
pub struct CalendarListController {
    args: CalendarListArgs,
    months: MonthList,
    broadcaster: SelectionBroadcaster,
    instance_id: InstanceId,
    today_id: DateId,
}

impl CalendarListController {
    /// Builds the initial month list. `broadcaster` may be shared with other
    /// lists; instance ids keep their selections apart.
    pub fn new(
        args: CalendarListArgs,
        broadcaster: SelectionBroadcaster,
        clock: &dyn Clock,
    ) -> Self {
        let months = MonthList::initialize(&args.month_list, clock);
        let instance_id = args.instance_id.clone().unwrap_or_default();
        let today_id = args.today_id.clone().unwrap_or_else(|| today_id(clock));
        debug!(%instance_id, months = months.len(), "calendar list created");
        Self {
            args,
            months,
            broadcaster,
            instance_id,
            today_id,
        }
    }

    /// The months currently in the list.
    pub fn months(&self) -> &MonthList {
        &self.months
    }

    /// The selection channel of this list.
    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    /// The broadcaster cells of this list subscribe to.
    pub fn broadcaster(&self) -> &SelectionBroadcaster {
        &self.broadcaster
    }

    /// The ranges currently highlighted.
    pub fn active_date_ranges(&self) -> &[ActiveDateRange] {
        &self.args.calendar_active_date_ranges
    }

    /// Pixel metrics in use.
    pub fn height_args(&self) -> &HeightArgs {
        &self.args.heights
    }

    /// Appends the future batch; returns how many months were added.
    pub fn on_end_reached(&mut self) -> usize {
        let before = self.months.len();
        self.months = self
            .months
            .append(self.args.month_list.future_scroll_range_in_months);
        self.months.len() - before
    }

    /// Prepends the past batch; returns how many months were added.
    pub fn on_start_reached(&mut self) -> usize {
        let before = self.months.len();
        self.months = self
            .months
            .prepend(self.args.month_list.past_scroll_range_in_months);
        self.months.len() - before
    }

    /// Stores `ranges` and pushes them to this list's mounted cells. Returns
    /// the number of cells notified.
    pub fn set_active_date_ranges(&mut self, ranges: Vec<ActiveDateRange>) -> usize {
        self.args.calendar_active_date_ranges = ranges.clone();
        let delivered = self
            .broadcaster
            .emit_active_date_ranges(Some(self.instance_id.clone()), ranges);
        debug!(instance_id = %self.instance_id, delivered, "active ranges broadcast");
        delivered
    }

    /// Height of every month, in list order.
    pub fn month_heights(&self) -> Vec<f32> {
        self.months
            .months()
            .iter()
            .map(|month| height_for_month(month, &self.args.heights))
            .collect()
    }

    /// Distance from the top of the list to the month containing `id`,
    /// extending the list to reach it first. `None` when bounds exclude it.
    #[tracing::instrument(level = "trace", skip_all, fields(id = %id))]
    pub fn scroll_offset_for_month(&mut self, id: &DateId) -> Option<f32> {
        self.months = self.months.add_missing_months(id);
        let index = self.months.index_of(id)?;
        Some(
            self.months
                .months()
                .iter()
                .take(index)
                .map(|month| height_for_month(month, &self.args.heights))
                .sum(),
        )
    }

    /// Distance from the top of the list to the week row holding `id`, plus
    /// `additional_offset`.
    pub fn scroll_offset_for_date(&mut self, id: &DateId, additional_offset: f32) -> Option<f32> {
        let month_offset = self.scroll_offset_for_month(id)?;
        let week = week_of_month(id.to_date(), self.months.first_day_of_week());
        Some(month_offset + week_offset_in_month(week, &self.args.heights) + additional_offset)
    }

    /// Base grid for one list item. Ranges are left out; mounted cells receive
    /// them separately.
    pub fn build_month(&self, month: &CalendarMonth) -> MonthGrid {
        let mut args = BuildCalendarArgs::new(month.id.clone())
            .calendar_first_day_of_week(self.months.first_day_of_week())
            .calendar_disabled_date_ids(self.args.calendar_disabled_date_ids.clone())
            .calendar_format_locale(self.args.calendar_format_locale.clone())
            .formatters(self.args.formatters.clone())
            .today_id(self.today_id.clone());
        args.calendar_min_date_id = self.args.month_list.min_date_id.clone();
        args.calendar_max_date_id = self.args.month_list.max_date_id.clone();
        build_calendar(&args)
    }

    /// A live cell for `base` on this list's channel, showing the current
    /// ranges.
    pub fn mount_day_cell(&self, base: CalendarDayMetadata) -> DayCell {
        DayCell::mount(
            &self.broadcaster,
            Some(self.instance_id.clone()),
            base,
            &self.args.calendar_active_date_ranges,
        )
    }

    /// Builds `month` and mounts every day as a live cell.
    pub fn mount_month(&self, month: &CalendarMonth) -> MountedMonth {
        let grid = self.build_month(month);
        MountedMonth {
            month: month.clone(),
            calendar_row_month: grid.calendar_row_month,
            week_days_list: grid.week_days_list,
            weeks: grid
                .weeks_list
                .into_iter()
                .map(|row| row.map(|day| self.mount_day_cell(day)))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use daygrid::{DayState, FixedClock};

    use super::*;

    fn id(text: &str) -> DateId {
        text.parse().unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock(id("2024-02-14").to_date())
    }

    fn controller(instance: &str, broadcaster: &SelectionBroadcaster) -> CalendarListController {
        let args = CalendarListArgs::default()
            .month_list(
                MonthListArgs::default()
                    .initial_month_id(id("2024-02-01"))
                    .past_scroll_range_in_months(0)
                    .future_scroll_range_in_months(0),
            )
            .instance_id(InstanceId::new(instance.to_owned()));
        CalendarListController::new(args, broadcaster.clone(), &clock())
    }

    #[test]
    fn scroll_offsets_extend_and_sum_heights() {
        let mut list = controller("list", &SelectionBroadcaster::new());
        assert_eq!(list.month_heights(), [268.0]);

        assert_eq!(list.scroll_offset_for_month(&id("2024-04-10")), Some(576.0));
        assert_eq!(list.months().len(), 3);
        assert_eq!(list.month_heights(), [268.0, 308.0, 268.0]);

        assert_eq!(list.scroll_offset_for_date(&id("2024-04-10"), 0.0), Some(672.0));
        assert_eq!(list.scroll_offset_for_date(&id("2024-04-10"), 5.0), Some(677.0));
        assert_eq!(list.scroll_offset_for_month(&id("2024-02-29")), Some(0.0));
    }

    #[test]
    fn scroll_offset_respects_bounds() {
        let args = CalendarListArgs::default().month_list(
            MonthListArgs::default()
                .initial_month_id(id("2024-02-01"))
                .past_scroll_range_in_months(0)
                .future_scroll_range_in_months(0)
                .max_date_id(id("2024-03-31")),
        );
        let mut list = CalendarListController::new(args, SelectionBroadcaster::new(), &clock());
        assert_eq!(list.scroll_offset_for_month(&id("2024-06-01")), None);
        assert_eq!(list.months().len(), 2);
    }

    #[test]
    fn edges_extend_by_batch() {
        let args = CalendarListArgs::default().month_list(
            MonthListArgs::default()
                .initial_month_id(id("2024-02-01"))
                .past_scroll_range_in_months(2)
                .future_scroll_range_in_months(3)
                .min_date_id(id("2023-11-01")),
        );
        let mut list = CalendarListController::new(args, SelectionBroadcaster::new(), &clock());
        assert_eq!(list.months().len(), 6);
        assert_eq!(list.on_end_reached(), 3);
        assert_eq!(list.on_start_reached(), 1);
        assert_eq!(list.on_start_reached(), 0);
        assert_eq!(list.months().first().unwrap().id.as_str(), "2023-11-01");
    }

    #[test]
    fn selection_reaches_only_own_cells() {
        let broadcaster = SelectionBroadcaster::new();
        let mut outbound = controller("outbound", &broadcaster);
        let inbound = controller("inbound", &broadcaster);
        let february = outbound.months().first().cloned().unwrap();

        let outbound_month = outbound.mount_month(&february);
        let inbound_month = inbound.mount_month(&february);
        assert_eq!(outbound_month.weeks.len(), 5);

        let delivered = outbound.set_active_date_ranges(vec![ActiveDateRange::between(
            id("2024-02-05"),
            id("2024-02-07"),
        )]);
        assert_eq!(delivered, 35);

        let active = |month: &MountedMonth| {
            month
                .snapshot()
                .days()
                .filter(|day| day.state == DayState::Active)
                .count()
        };
        assert_eq!(active(&outbound_month), 3);
        assert_eq!(active(&inbound_month), 0);

        let today = outbound_month.cell(&id("2024-02-14")).unwrap();
        assert_eq!(today.metadata().state, DayState::Today);
    }

    #[test]
    fn cells_mounted_later_show_current_ranges() {
        let broadcaster = SelectionBroadcaster::new();
        let mut list = controller("late", &broadcaster);
        list.set_active_date_ranges(vec![ActiveDateRange::starting_at(id("2024-03-04"))]);
        list.scroll_offset_for_month(&id("2024-03-01"));
        let march = list.months().last().cloned().unwrap();

        let mounted = list.mount_month(&march);
        let start = mounted.cell(&id("2024-03-04")).unwrap().metadata();
        assert_eq!(start.state, DayState::Active);
        assert!(start.is_start_of_range);
        assert!(!start.is_range_valid);

        drop(mounted);
        assert!(broadcaster.is_empty());
    }
}
