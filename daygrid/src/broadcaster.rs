//! Instance-scoped fan-out of selection changes.
//!
//! A [`SelectionBroadcaster`] lets thousands of day cells listen for "active
//! ranges changed" without the owner of the selection knowing about them.
//! Handlers are registered under an [`InstanceId`]; an event only reaches the
//! handlers of its own instance, so the cost of a selection change is bounded
//! by the number of cells in that calendar, not by every cell alive.
//!
//! There is no global broadcaster. The component that owns the selection
//! creates one and hands clones (which share the registry) to its cells.
//!
//! ```
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//! use daygrid::{CalendarEventKind, InstanceId, SelectionBroadcaster};
//!
//! let broadcaster = SelectionBroadcaster::new();
//! let hits = Arc::new(AtomicUsize::new(0));
//! let counter = hits.clone();
//! let id = broadcaster.on(
//!     CalendarEventKind::ActiveDateRangesChanged,
//!     InstanceId::DEFAULT,
//!     move |_| {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     },
//! );
//! broadcaster.emit_active_date_ranges(None, Vec::new());
//! broadcaster.emit_active_date_ranges(Some(InstanceId::new("other")), Vec::new());
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! assert!(broadcaster.off(id));
//! ```

use std::{
    borrow::Cow,
    collections::BTreeMap,
    fmt,
    sync::{Arc, Weak},
};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::day_state::ActiveDateRange;

/// Scopes events to one logical calendar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(Cow<'static, str>);

impl InstanceId {
    /// The instance every calendar without an explicit id belongs to.
    ///
    /// Unnamed calendars intentionally share this instance and therefore see
    /// each other's selection changes.
    pub const DEFAULT: InstanceId = InstanceId(Cow::Borrowed("__daygrid_default_instance__"));

    /// A named instance.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The instance name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `id`, or [`InstanceId::DEFAULT`] when absent.
    pub fn or_default(id: Option<&InstanceId>) -> &InstanceId {
        id.unwrap_or(&DEFAULT_INSTANCE)
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static DEFAULT_INSTANCE: InstanceId = InstanceId::DEFAULT;

/// Kinds of events a handler can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarEventKind {
    /// The active ranges of an instance changed.
    ActiveDateRangesChanged,
}

/// Payload of [`CalendarEvent::ActiveDateRangesChanged`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveRangesEvent {
    /// Target instance; the default instance when absent.
    pub instance_id: Option<InstanceId>,
    /// The new active ranges, replacing the previous ones entirely.
    pub ranges: Vec<ActiveDateRange>,
}

/// Events delivered through a [`SelectionBroadcaster`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEvent {
    /// The active ranges of an instance changed.
    ActiveDateRangesChanged(ActiveRangesEvent),
}

impl CalendarEvent {
    /// The kind handlers subscribe with.
    pub fn kind(&self) -> CalendarEventKind {
        match self {
            CalendarEvent::ActiveDateRangesChanged(_) => CalendarEventKind::ActiveDateRangesChanged,
        }
    }

    /// The instance this event targets.
    pub fn instance_id(&self) -> &InstanceId {
        match self {
            CalendarEvent::ActiveDateRangesChanged(event) => {
                InstanceId::or_default(event.instance_id.as_ref())
            }
        }
    }
}

/// Handle returned by [`SelectionBroadcaster::on`], used to unsubscribe.
///
/// Ids grow monotonically per broadcaster, so they also encode registration
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&CalendarEvent) + Send + Sync>;

struct Entry {
    kind: CalendarEventKind,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    by_instance: FxHashMap<InstanceId, BTreeMap<SubscriptionId, Entry>>,
    locations: FxHashMap<SubscriptionId, InstanceId>,
}

/// Synchronous, instance-scoped publish/subscribe channel.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct SelectionBroadcaster {
    registry: Arc<RwLock<Registry>>,
}

impl fmt::Debug for SelectionBroadcaster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionBroadcaster")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl SelectionBroadcaster {
    /// An empty broadcaster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events of `kind` targeting `instance_id`.
    pub fn on<F>(
        &self,
        kind: CalendarEventKind,
        instance_id: InstanceId,
        handler: F,
    ) -> SubscriptionId
    where
        F: Fn(&CalendarEvent) + Send + Sync + 'static,
    {
        let mut registry = self.registry.write();
        let id = SubscriptionId(registry.next_id);
        registry.next_id = registry.next_id.wrapping_add(1);
        trace!(?id, %instance_id, ?kind, "subscribe");
        registry.locations.insert(id, instance_id.clone());
        registry.by_instance.entry(instance_id).or_default().insert(
            id,
            Entry {
                kind,
                handler: Arc::new(handler),
            },
        );
        id
    }

    /// Like [`Self::on`], but unsubscribes when the returned guard drops.
    pub fn subscribe<F>(
        &self,
        kind: CalendarEventKind,
        instance_id: InstanceId,
        handler: F,
    ) -> Subscription
    where
        F: Fn(&CalendarEvent) + Send + Sync + 'static,
    {
        let id = self.on(kind, instance_id, handler);
        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
        }
    }

    /// Removes a handler. Unknown ids are ignored and return `false`.
    pub fn off(&self, id: SubscriptionId) -> bool {
        remove_subscription(&mut self.registry.write(), id)
    }

    /// Delivers `event` to every handler of its kind and instance, in
    /// registration order, before returning the number of handlers invoked.
    ///
    /// The handler set is captured when `emit` is called and the registry is
    /// unlocked while handlers run, so handlers may subscribe, unsubscribe or
    /// emit themselves. A handler added during delivery waits for the next
    /// emit; a handler removed during delivery is skipped if it has not run
    /// yet and is not counted.
    #[tracing::instrument(level = "trace", skip_all, fields(instance = %event.instance_id()))]
    pub fn emit(&self, event: &CalendarEvent) -> usize {
        let kind = event.kind();
        let handlers: SmallVec<[(SubscriptionId, Handler); 8]> = {
            let registry = self.registry.read();
            registry
                .by_instance
                .get(event.instance_id())
                .map(|entries| {
                    entries
                        .iter()
                        .filter(|(_, entry)| entry.kind == kind)
                        .map(|(id, entry)| (*id, entry.handler.clone()))
                        .collect()
                })
                .unwrap_or_default()
        };
        let mut delivered = 0;
        for (id, handler) in &handlers {
            if !self.registry.read().locations.contains_key(id) {
                trace!(?id, "skipping handler removed during emit");
                continue;
            }
            handler(event);
            delivered += 1;
        }
        trace!(delivered, "emit");
        delivered
    }

    /// Emits [`CalendarEvent::ActiveDateRangesChanged`].
    pub fn emit_active_date_ranges(
        &self,
        instance_id: Option<InstanceId>,
        ranges: Vec<ActiveDateRange>,
    ) -> usize {
        self.emit(&CalendarEvent::ActiveDateRangesChanged(ActiveRangesEvent {
            instance_id,
            ranges,
        }))
    }

    /// Handlers registered under `instance_id`.
    pub fn subscriber_count(&self, instance_id: &InstanceId) -> usize {
        self.registry
            .read()
            .by_instance
            .get(instance_id)
            .map_or(0, BTreeMap::len)
    }

    /// Handlers registered across all instances.
    pub fn len(&self) -> usize {
        self.registry.read().locations.len()
    }

    /// Whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn remove_subscription(registry: &mut Registry, id: SubscriptionId) -> bool {
    let Some(instance_id) = registry.locations.remove(&id) else {
        trace!(?id, "unsubscribe of unknown id ignored");
        return false;
    };
    if let Some(entries) = registry.by_instance.get_mut(&instance_id) {
        entries.remove(&id);
        if entries.is_empty() {
            registry.by_instance.remove(&instance_id);
        }
    }
    trace!(?id, %instance_id, "unsubscribe");
    true
}

/// Keeps a handler registered for as long as it lives.
#[must_use = "dropping a Subscription unsubscribes its handler"]
pub struct Subscription {
    registry: Weak<RwLock<Registry>>,
    id: SubscriptionId,
}

impl Subscription {
    /// The underlying subscription id.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscription").field(&self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            remove_subscription(&mut registry.write(), self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;

    const KIND: CalendarEventKind = CalendarEventKind::ActiveDateRangesChanged;

    fn counter(broadcaster: &SelectionBroadcaster, instance: InstanceId) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_handler = hits.clone();
        broadcaster.on(KIND, instance, move |_| {
            hits_in_handler.fetch_add(1, Ordering::SeqCst);
        });
        hits
    }

    #[test]
    fn events_reach_only_their_instance() {
        let broadcaster = SelectionBroadcaster::new();
        let a = counter(&broadcaster, InstanceId::new("a"));
        let b = counter(&broadcaster, InstanceId::new("b"));
        let shared = counter(&broadcaster, InstanceId::DEFAULT);

        assert_eq!(broadcaster.emit_active_date_ranges(Some(InstanceId::new("a")), vec![]), 1);
        assert_eq!(broadcaster.emit_active_date_ranges(None, vec![]), 1);
        assert_eq!(broadcaster.emit_active_date_ranges(Some(InstanceId::new("c")), vec![]), 0);

        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 0);
        assert_eq!(shared.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn explicit_default_id_equals_missing_id() {
        let broadcaster = SelectionBroadcaster::new();
        let shared = counter(&broadcaster, InstanceId::default());
        broadcaster.emit_active_date_ranges(Some(InstanceId::DEFAULT), vec![]);
        broadcaster.emit_active_date_ranges(None, vec![]);
        assert_eq!(shared.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let broadcaster = SelectionBroadcaster::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for index in 0..5 {
            let order = order.clone();
            broadcaster.on(KIND, InstanceId::DEFAULT, move |_| order.lock().push(index));
        }
        broadcaster.emit_active_date_ranges(None, vec![]);
        assert_eq!(*order.lock(), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn off_is_symmetric_and_tolerates_unknown_ids() {
        let broadcaster = SelectionBroadcaster::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_handler = hits.clone();
        let id = broadcaster.on(KIND, InstanceId::new("a"), move |_| {
            hits_in_handler.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(broadcaster.subscriber_count(&InstanceId::new("a")), 1);
        assert!(broadcaster.off(id));
        assert!(!broadcaster.off(id));
        assert!(broadcaster.is_empty());
        broadcaster.emit_active_date_ranges(Some(InstanceId::new("a")), vec![]);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn subscription_guard_unsubscribes_on_drop() {
        let broadcaster = SelectionBroadcaster::new();
        let guard = broadcaster.subscribe(KIND, InstanceId::DEFAULT, |_| {});
        assert_eq!(broadcaster.len(), 1);
        drop(guard);
        assert_eq!(broadcaster.len(), 0);
    }

    #[test]
    fn guard_outliving_broadcaster_is_harmless() {
        let broadcaster = SelectionBroadcaster::new();
        let guard = broadcaster.subscribe(KIND, InstanceId::DEFAULT, |_| {});
        drop(broadcaster);
        drop(guard);
    }

    #[test]
    fn handlers_may_unsubscribe_during_emit() {
        let broadcaster = SelectionBroadcaster::new();
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
        let hits = Arc::new(AtomicUsize::new(0));
        let id = {
            let broadcaster_in_handler = broadcaster.clone();
            let slot = slot.clone();
            let hits = hits.clone();
            broadcaster.on(KIND, InstanceId::DEFAULT, move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
                if let Some(id) = slot.lock().take() {
                    broadcaster_in_handler.off(id);
                }
            })
        };
        *slot.lock() = Some(id);

        assert_eq!(broadcaster.emit_active_date_ranges(None, vec![]), 1);
        assert_eq!(broadcaster.emit_active_date_ranges(None, vec![]), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handlers_removed_during_emit_are_skipped() {
        let broadcaster = SelectionBroadcaster::new();
        let later: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
        {
            let broadcaster_in_handler = broadcaster.clone();
            let later = later.clone();
            broadcaster.on(KIND, InstanceId::DEFAULT, move |_| {
                if let Some(id) = *later.lock() {
                    broadcaster_in_handler.off(id);
                }
            });
        }
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_handler = hits.clone();
        let second = broadcaster.on(KIND, InstanceId::DEFAULT, move |_| {
            hits_in_handler.fetch_add(1, Ordering::SeqCst);
        });
        *later.lock() = Some(second);

        assert_eq!(broadcaster.emit_active_date_ranges(None, vec![]), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(broadcaster.subscriber_count(&InstanceId::DEFAULT), 1);
    }

    #[test]
    fn handlers_added_during_emit_wait_for_the_next_one() {
        let broadcaster = SelectionBroadcaster::new();
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let broadcaster_in_handler = broadcaster.clone();
            let hits = hits.clone();
            let added = Arc::new(AtomicUsize::new(0));
            broadcaster.on(KIND, InstanceId::DEFAULT, move |_| {
                if added.fetch_add(1, Ordering::SeqCst) == 0 {
                    let hits = hits.clone();
                    broadcaster_in_handler.on(KIND, InstanceId::DEFAULT, move |_| {
                        hits.fetch_add(1, Ordering::SeqCst);
                    });
                }
            });
        }

        assert_eq!(broadcaster.emit_active_date_ranges(None, vec![]), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(broadcaster.emit_active_date_ranges(None, vec![]), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fresh_broadcasters_are_isolated() {
        let first = SelectionBroadcaster::new();
        let second = SelectionBroadcaster::new();
        let hits = counter(&first, InstanceId::DEFAULT);
        second.emit_active_date_ranges(None, vec![]);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
