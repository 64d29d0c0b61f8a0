//! Headless calendar components built on [`daygrid`].
//!
//! Nothing here draws. Each component keeps the state a renderer needs and
//! hands back plain data: grids of [`daygrid::CalendarDayMetadata`] and a
//! [`theme::DayStyle`] per cell.
//!
//! # Example
//!
//! ```
//! use daygrid::{FixedClock, MonthListArgs, SelectionBroadcaster};
//! use daygrid_components::{
//!     calendar_list::{CalendarListArgs, CalendarListController},
//!     date_range::DateRangeState,
//! };
//!
//! let clock = FixedClock("2024-02-14".parse().unwrap());
//! let mut list = CalendarListController::new(
//!     CalendarListArgs::default().month_list(
//!         MonthListArgs::default()
//!             .past_scroll_range_in_months(1)
//!             .future_scroll_range_in_months(1),
//!     ),
//!     SelectionBroadcaster::new(),
//!     &clock,
//! );
//! let february = list.months().months()[1].clone();
//! let mounted = list.mount_month(&february);
//!
//! let mut selection = DateRangeState::new();
//! selection.on_calendar_day_press("2024-02-05".parse().unwrap());
//! selection.on_calendar_day_press("2024-02-09".parse().unwrap());
//! assert_eq!(list.set_active_date_ranges(selection.active_date_ranges()), 35);
//!
//! let cell = mounted.cell(&"2024-02-07".parse().unwrap()).unwrap();
//! assert!(cell.metadata().is_range_valid);
//! ```
#![deny(missing_docs, clippy::unwrap_used)]

pub mod calendar;
pub mod calendar_list;
pub mod date_range;
pub mod day_cell;
pub mod theme;

pub use calendar::{Calendar, CalendarArgs, DayPressHandler};
pub use calendar_list::{CalendarListArgs, CalendarListController, MountedMonth};
pub use date_range::DateRangeState;
pub use day_cell::DayCell;
pub use theme::{CalendarPalette, CalendarTheme, Color, DayStyle, DayStyleFn, DayVariant};
