//! A day cell that follows selection changes on its own.
//!
//! ## Usage
//!
//! Mount one [`DayCell`] per visible day of a calendar list. The cell listens
//! on its instance of the [`SelectionBroadcaster`] and recomputes only its own
//! range fields, so a selection change costs one cheap update per cell of the
//! affected calendar instead of a rebuild of every month.
//!
//! Base metadata for list cells should be built without active ranges; the
//! ranges arrive through [`DayCell::mount`] and the broadcaster.

use std::sync::Arc;

use daygrid::{
    ActiveDateRange, CalendarDayMetadata, CalendarEvent, CalendarEventKind, DayState, InstanceId,
    SelectionBroadcaster, Subscription, resolve_range_state,
};
use parking_lot::RwLock;

struct CellSlot {
    base: CalendarDayMetadata,
    current: CalendarDayMetadata,
    /// Last ranges delivered, re-applied whenever the base changes.
    ranges: Vec<ActiveDateRange>,
    version: u64,
}

impl CellSlot {
    fn new(base: CalendarDayMetadata, ranges: &[ActiveDateRange]) -> Self {
        let mut slot = Self {
            current: base.clone(),
            base,
            ranges: ranges.to_vec(),
            version: 0,
        };
        slot.current = slot.resolved();
        slot
    }

    fn resolved(&self) -> CalendarDayMetadata {
        let fields = resolve_range_state(&self.base.id, &self.ranges);
        let mut next = self.base.clone();
        if fields.state == DayState::Active {
            next.apply_range_fields(&fields);
        }
        next
    }

    fn refresh(&mut self) {
        let next = self.resolved();
        if next != self.current {
            self.current = next;
            self.version = self.version.wrapping_add(1);
        }
    }

    fn apply_ranges(&mut self, ranges: &[ActiveDateRange]) {
        if self.ranges != ranges {
            self.ranges = ranges.to_vec();
            self.refresh();
        }
    }

    fn set_base(&mut self, base: CalendarDayMetadata) {
        if self.base != base {
            self.base = base;
            self.refresh();
        }
    }
}

/// Live metadata for one day, kept in sync with its calendar's selection.
///
/// Dropping the cell unsubscribes it.
pub struct DayCell {
    slot: Arc<RwLock<CellSlot>>,
    instance_id: InstanceId,
    _subscription: Subscription,
}

impl DayCell {
    /// Subscribes a cell for `base` on `instance_id` (the shared default
    /// instance when `None`) and applies `active_date_ranges` right away.
    pub fn mount(
        broadcaster: &SelectionBroadcaster,
        instance_id: Option<InstanceId>,
        base: CalendarDayMetadata,
        active_date_ranges: &[ActiveDateRange],
    ) -> Self {
        let instance_id = instance_id.unwrap_or_default();
        let slot = Arc::new(RwLock::new(CellSlot::new(base, active_date_ranges)));

        let weak_slot = Arc::downgrade(&slot);
        let subscription = broadcaster.subscribe(
            CalendarEventKind::ActiveDateRangesChanged,
            instance_id.clone(),
            move |event| {
                let CalendarEvent::ActiveDateRangesChanged(payload) = event;
                if let Some(slot) = weak_slot.upgrade() {
                    slot.write().apply_ranges(&payload.ranges);
                }
            },
        );

        Self {
            slot,
            instance_id,
            _subscription: subscription,
        }
    }

    /// The instance this cell listens on.
    pub fn instance_id(&self) -> &InstanceId {
        &self.instance_id
    }

    /// A copy of the current metadata.
    pub fn metadata(&self) -> CalendarDayMetadata {
        self.slot.read().current.clone()
    }

    /// Runs `f` with the current metadata without copying it.
    pub fn with_metadata<R>(&self, f: impl FnOnce(&CalendarDayMetadata) -> R) -> R {
        f(&self.slot.read().current)
    }

    /// A copy of the base metadata the cell falls back to.
    pub fn base(&self) -> CalendarDayMetadata {
        self.slot.read().base.clone()
    }

    /// Counts effective metadata changes since mount; unchanged means no redraw
    /// is needed.
    pub fn version(&self) -> u64 {
        self.slot.read().version
    }

    /// Resynchronizes to new base metadata, e.g. after the host rebuilt the
    /// month or recycled this cell for another day.
    ///
    /// The last ranges the cell received are re-applied on top of the new base.
    pub fn set_base(&self, base: CalendarDayMetadata) {
        self.slot.write().set_base(base);
    }
}
