//! Two-tap date range selection.
//!
//! ## Usage
//!
//! Feed day presses into [`DateRangeState::on_calendar_day_press`] and hand
//! [`DateRangeState::active_date_ranges`] to a calendar or calendar list.

use daygrid::{ActiveDateRange, DateId};
use tracing::trace;

/// Holds the range being selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRangeState {
    range: ActiveDateRange,
}

impl DateRangeState {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection seeded with `range`, normalized so the start never follows
    /// the end.
    pub fn with_initial(range: ActiveDateRange) -> Self {
        Self {
            range: range.normalized(),
        }
    }

    /// The range as currently selected.
    pub fn range(&self) -> &ActiveDateRange {
        &self.range
    }

    /// The selection in the shape calendars consume.
    pub fn active_date_ranges(&self) -> Vec<ActiveDateRange> {
        vec![self.range.clone()]
    }

    /// Whether both ends are selected.
    pub fn is_date_range_valid(&self) -> bool {
        self.range.is_valid()
    }

    /// Advances the selection with a press on `id`.
    ///
    /// - Nothing selected, or a complete range: start a new range at `id`.
    /// - Only a start selected: close the range at `id`, swapping ends when
    ///   `id` comes first.
    pub fn on_calendar_day_press(&mut self, id: DateId) {
        self.range = match (self.range.start_id.take(), self.range.end_id.take()) {
            (Some(start), None) if id < start => ActiveDateRange::between(id, start),
            (Some(start), None) => ActiveDateRange::between(start, id),
            _ => ActiveDateRange::starting_at(id),
        };
        trace!(range = ?self.range, "date range updated");
    }

    /// Drops the selection.
    pub fn clear(&mut self) {
        self.range = ActiveDateRange::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(text: &str) -> DateId {
        text.parse().unwrap()
    }

    #[test]
    fn two_presses_make_a_range() {
        let mut state = DateRangeState::new();
        state.on_calendar_day_press(id("2024-03-05"));
        assert_eq!(state.range(), &ActiveDateRange::starting_at(id("2024-03-05")));
        assert!(!state.is_date_range_valid());

        state.on_calendar_day_press(id("2024-03-09"));
        assert_eq!(
            state.range(),
            &ActiveDateRange::between(id("2024-03-05"), id("2024-03-09"))
        );
        assert!(state.is_date_range_valid());
    }

    #[test]
    fn press_after_complete_range_starts_over() {
        let mut state =
            DateRangeState::with_initial(ActiveDateRange::between(id("2024-03-05"), id("2024-03-09")));
        state.on_calendar_day_press(id("2024-03-01"));
        assert_eq!(state.range(), &ActiveDateRange::starting_at(id("2024-03-01")));
    }

    #[test]
    fn earlier_second_press_swaps_ends() {
        let mut state = DateRangeState::new();
        state.on_calendar_day_press(id("2024-03-05"));
        state.on_calendar_day_press(id("2024-02-27"));
        assert_eq!(
            state.range(),
            &ActiveDateRange::between(id("2024-02-27"), id("2024-03-05"))
        );
    }

    #[test]
    fn pressing_start_again_selects_single_day() {
        let mut state = DateRangeState::new();
        state.on_calendar_day_press(id("2024-03-05"));
        state.on_calendar_day_press(id("2024-03-05"));
        assert_eq!(
            state.range(),
            &ActiveDateRange::between(id("2024-03-05"), id("2024-03-05"))
        );
    }

    #[test]
    fn clear_and_initial_normalization() {
        let mut state =
            DateRangeState::with_initial(ActiveDateRange::between(id("2024-03-09"), id("2024-03-05")));
        assert_eq!(state.range().start_id, Some(id("2024-03-05")));
        assert_eq!(state.active_date_ranges().len(), 1);
        state.clear();
        assert_eq!(state.range(), &ActiveDateRange::default());
    }
}
