//! Per-day state resolution.
//!
//! A day's [`DayState`] is derived from the active ranges, the disabled ids,
//! the min/max bounds and today's id with a fixed precedence: **active >
//! disabled > today > idle**. A day inside a selected range is always
//! `Active`, even when it is also disabled or today.

use crate::date_id::DateId;

/// A selected span of days. Either end may be missing while a selection is
/// in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ActiveDateRange {
    /// First selected day.
    pub start_id: Option<DateId>,
    /// Last selected day.
    pub end_id: Option<DateId>,
}

impl ActiveDateRange {
    /// Creates a range from optional ends.
    pub fn new(start_id: Option<DateId>, end_id: Option<DateId>) -> Self {
        Self { start_id, end_id }
    }

    /// A half-open range that only has a start.
    pub fn starting_at(start_id: DateId) -> Self {
        Self::new(Some(start_id), None)
    }

    /// A complete range.
    pub fn between(start_id: DateId, end_id: DateId) -> Self {
        Self::new(Some(start_id), Some(end_id))
    }

    /// Whether both ends are present.
    pub fn is_valid(&self) -> bool {
        self.start_id.is_some() && self.end_id.is_some()
    }

    /// Whether both ends are present and the end precedes the start.
    pub fn is_inverted(&self) -> bool {
        matches!((&self.start_id, &self.end_id), (Some(start), Some(end)) if end < start)
    }

    /// The same range with its ends swapped when inverted.
    ///
    /// Inverted ranges never match any day; callers who prefer to treat them
    /// as the span between their ends normalize first.
    pub fn normalized(&self) -> Self {
        if self.is_inverted() {
            Self::new(self.end_id.clone(), self.start_id.clone())
        } else {
            self.clone()
        }
    }

    /// Whether `id` is covered by this range.
    ///
    /// A complete range covers `start..=end`; a half-open range covers only its
    /// one present end; an empty range covers nothing.
    pub fn contains(&self, id: &DateId) -> bool {
        match (&self.start_id, &self.end_id) {
            (Some(start), Some(end)) => start <= id && id <= end,
            (Some(start), None) => start == id,
            (None, Some(end)) => end == id,
            (None, None) => false,
        }
    }
}

/// Visual state of one day cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DayState {
    /// Nothing special about the day.
    #[default]
    Idle,
    /// The day is covered by an active range.
    Active,
    /// The day is today.
    Today,
    /// The day cannot be selected.
    Disabled,
}

impl DayState {
    /// Every state, in precedence order.
    pub const ALL: [DayState; 4] = [
        DayState::Active,
        DayState::Disabled,
        DayState::Today,
        DayState::Idle,
    ];
}

/// Inputs for [`resolve_day_state`].
#[derive(Debug, Clone, Copy)]
pub struct DayStateInput<'a> {
    /// The day being resolved.
    pub id: &'a DateId,
    /// Today's id, if known.
    pub today_id: Option<&'a DateId>,
    /// Active ranges; the first one containing `id` wins.
    pub active_date_ranges: &'a [ActiveDateRange],
    /// Days that cannot be selected.
    pub disabled_date_ids: &'a [DateId],
    /// Days before this one are disabled.
    pub min_date_id: Option<&'a DateId>,
    /// Days after this one are disabled.
    pub max_date_id: Option<&'a DateId>,
}

impl<'a> DayStateInput<'a> {
    /// Input for `id` with no constraints.
    pub fn new(id: &'a DateId) -> Self {
        Self {
            id,
            today_id: None,
            active_date_ranges: &[],
            disabled_date_ids: &[],
            min_date_id: None,
            max_date_id: None,
        }
    }
}

/// The state-affecting fields of a day, always fully computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayStateFields {
    /// Resolved state.
    pub state: DayState,
    /// Disabled by id, min or max.
    pub is_disabled: bool,
    /// The day is today.
    pub is_today: bool,
    /// The day is the matched range's start.
    pub is_start_of_range: bool,
    /// The day is the matched range's end.
    pub is_end_of_range: bool,
    /// The matched range has both ends.
    pub is_range_valid: bool,
}

/// Returns the first range in `ranges` that covers `id`.
pub fn find_active_range<'r>(
    id: &DateId,
    ranges: &'r [ActiveDateRange],
) -> Option<&'r ActiveDateRange> {
    ranges.iter().find(|range| range.contains(id))
}

/// Resolves the state of one day.
pub fn resolve_day_state(input: &DayStateInput<'_>) -> DayStateFields {
    let id = input.id;
    let matched = find_active_range(id, input.active_date_ranges);

    let is_disabled = input.disabled_date_ids.contains(id)
        || input.min_date_id.is_some_and(|min| id < min)
        || input.max_date_id.is_some_and(|max| id > max);
    let is_today = input.today_id.is_some_and(|today| today == id);

    let state = if matched.is_some() {
        DayState::Active
    } else if is_disabled {
        DayState::Disabled
    } else if is_today {
        DayState::Today
    } else {
        DayState::Idle
    };

    DayStateFields {
        state,
        is_disabled,
        is_today,
        is_start_of_range: matched.is_some_and(|range| range.start_id.as_ref() == Some(id)),
        is_end_of_range: matched.is_some_and(|range| range.end_id.as_ref() == Some(id)),
        is_range_valid: matched.is_some_and(ActiveDateRange::is_valid),
    }
}

/// Resolves only what the active ranges say about `id`.
///
/// Disabled ids and bounds are not consulted; they belong to a cell's base
/// metadata and only change with a full rebuild.
pub fn resolve_range_state(id: &DateId, ranges: &[ActiveDateRange]) -> DayStateFields {
    resolve_day_state(&DayStateInput {
        active_date_ranges: ranges,
        ..DayStateInput::new(id)
    })
}
