//! A single month with selection callbacks.
//!
//! ## Usage
//!
//! Use [`Calendar`] for a standalone month picker. Range changes rebuild the
//! whole month, which is cheap for one grid; scrolling lists should use
//! [`crate::calendar_list::CalendarListController`] instead.

use std::{fmt, sync::Arc};

use daygrid::{
    ActiveDateRange, BuildCalendarArgs, CalendarDayMetadata, Clock, DateId, InstanceId, MonthGrid,
    SelectionBroadcaster, build_calendar, today_id,
};
use derive_setters::Setters;
use tracing::{debug, trace};

use crate::theme::{CalendarTheme, DayStyle};

/// Handler for presses on enabled days.
pub type DayPressHandler = Arc<dyn Fn(&DateId) + Send + Sync>;

/// Arguments for [`Calendar`].
#[derive(Clone, Setters)]
pub struct CalendarArgs {
    /// Grid configuration: month, first weekday, ranges, bounds, formatters.
    pub build: BuildCalendarArgs,
    /// Selection channel this calendar belongs to.
    #[setters(strip_option)]
    pub instance_id: Option<InstanceId>,
    /// Where range changes are announced to other views of the same
    /// instance. Nothing is emitted when absent.
    #[setters(strip_option)]
    pub broadcaster: Option<SelectionBroadcaster>,
    /// Day styling.
    pub theme: CalendarTheme,
    /// Called with the id of each pressed day that is not disabled.
    #[setters(skip)]
    pub on_calendar_day_press: Option<DayPressHandler>,
}

impl CalendarArgs {
    /// Arguments for the month containing `calendar_month_id`.
    pub fn new(calendar_month_id: DateId) -> Self {
        Self {
            build: BuildCalendarArgs::new(calendar_month_id),
            instance_id: None,
            broadcaster: None,
            theme: CalendarTheme::default(),
            on_calendar_day_press: None,
        }
    }

    /// Sets the day press handler.
    pub fn on_calendar_day_press<F>(mut self, on_press: F) -> Self
    where
        F: Fn(&DateId) + Send + Sync + 'static,
    {
        self.on_calendar_day_press = Some(Arc::new(on_press));
        self
    }
}

impl fmt::Debug for CalendarArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarArgs")
            .field("build", &self.build)
            .field("instance_id", &self.instance_id)
            .field("broadcaster", &self.broadcaster)
            .field("theme", &self.theme)
            .field(
                "on_calendar_day_press",
                &self.on_calendar_day_press.as_ref().map(|_| ".."),
            )
            .finish()
    }
}

/// One month, built and ready to paint.
///
/// Today is pinned when the calendar is created.
#[derive(Debug, Clone)]
pub struct Calendar {
    args: CalendarArgs,
    grid: MonthGrid,
}

impl Calendar {
    /// Builds the month described by `args`, reading today from `clock` unless
    /// `args.build.today_id` is set.
    pub fn new(mut args: CalendarArgs, clock: &dyn Clock) -> Self {
        if args.build.today_id.is_none() {
            args.build.today_id = Some(today_id(clock));
        }
        let grid = build_calendar(&args.build);
        Self { args, grid }
    }

    /// The current grid.
    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    /// The arguments the grid was built from.
    pub fn args(&self) -> &CalendarArgs {
        &self.args
    }

    /// The selection channel, the shared default when none was configured.
    pub fn instance_id(&self) -> &InstanceId {
        InstanceId::or_default(self.args.instance_id.as_ref())
    }

    /// Style for `day` under this calendar's theme.
    pub fn day_style(&self, day: &CalendarDayMetadata) -> DayStyle {
        self.args.theme.day_style(day)
    }

    /// Every cell paired with its style, in row order.
    pub fn styled_days(&self) -> impl Iterator<Item = (&CalendarDayMetadata, DayStyle)> {
        self.grid.days().map(move |day| (day, self.day_style(day)))
    }

    /// Replaces the highlighted ranges and rebuilds the month, then announces
    /// the new ranges on this calendar's instance when a broadcaster is set.
    ///
    /// Returns the number of handlers notified; unchanged ranges notify no one.
    pub fn set_active_date_ranges(&mut self, ranges: Vec<ActiveDateRange>) -> usize {
        if self.args.build.calendar_active_date_ranges == ranges {
            return 0;
        }
        self.args.build.calendar_active_date_ranges = ranges;
        self.rebuild();
        match &self.args.broadcaster {
            Some(broadcaster) => broadcaster.emit_active_date_ranges(
                Some(self.instance_id().clone()),
                self.args.build.calendar_active_date_ranges.clone(),
            ),
            None => 0,
        }
    }

    /// Shows the month containing `month_id`.
    pub fn set_month(&mut self, month_id: DateId) {
        let month_id = DateId::month_of(month_id.to_date());
        if DateId::month_of(self.args.build.calendar_month_id.to_date()) == month_id {
            return;
        }
        self.args.build.calendar_month_id = month_id;
        self.rebuild();
    }

    /// Handles a press on `id`. Returns whether the press handler ran; presses
    /// on disabled days and on days outside the grid are dropped.
    pub fn on_day_press(&self, id: &DateId) -> bool {
        let Some(day) = self.grid.day(id) else {
            trace!(%id, "press outside grid ignored");
            return false;
        };
        if day.is_disabled {
            trace!(%id, "press on disabled day ignored");
            return false;
        }
        match &self.args.on_calendar_day_press {
            Some(handler) => {
                handler(id);
                true
            }
            None => false,
        }
    }

    fn rebuild(&mut self) {
        self.grid = build_calendar(&self.args.build);
        debug!(month = %self.args.build.calendar_month_id, "calendar rebuilt");
    }
}
