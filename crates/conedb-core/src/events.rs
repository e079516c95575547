//! Typed event emitter
//!
//! A synchronous publish/subscribe registry keyed by an event-type enum.
//! Producers call [`Emitter::emit`]; consumers register listeners with
//! [`Emitter::on`]. Per-type filter chains can transform or veto events
//! before delivery, and [`Emitter::mute`] silences a type entirely.
//!
//! Delivery model:
//!
//! - Muted type: `emit` is a complete no-op — no filters run, no listeners
//!   run.
//! - No filters registered: every listener is notified exactly once with
//!   the original event.
//! - Filters registered: each filter is applied to the *original* event,
//!   in registration order, and every filter that returns `Some` triggers
//!   a full listener notification round with that filter's result. N
//!   surviving filters therefore produce N notification rounds per `emit`.
//!   This fan-out is intentional and part of the compatibility contract;
//!   see DESIGN.md before changing it to a sequential fold.
//!
//! A surviving filter result is routed to the listeners registered for the
//! *result's* `event_type` — a filter may redirect an event to a different
//! type by rewriting it. Muting is checked once, at `emit` time, against
//! the emitted type.
//!
//! Listeners and filters run synchronously on the emitting thread. The
//! registries are snapshotted before invocation, so callbacks may re-enter
//! the emitter (registering listeners, muting types, even emitting) without
//! deadlocking. A panicking callback propagates to the `emit` caller.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use crate::types::Metadata;

/// An event delivered to listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<T> {
    /// The declared event type.
    pub event_type: T,
    /// Flat primitive metadata attached at emit time.
    pub metadata: Metadata,
}

type Listener<T> = Arc<dyn Fn(&Event<T>) + Send + Sync>;
type Filter<T> = Arc<dyn Fn(&Event<T>) -> Option<Event<T>> + Send + Sync>;

struct Registry<T> {
    listeners: HashMap<T, Vec<Listener<T>>>,
    filters: HashMap<T, Vec<Filter<T>>>,
    muted: HashSet<T>,
}

impl<T: Eq + Hash> Default for Registry<T> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
            filters: HashMap::new(),
            muted: HashSet::new(),
        }
    }
}

/// Typed event emitter.
///
/// `T` is the event-type key; any small `Copy` enum with `Eq + Hash` works.
///
/// # Example
///
/// ```rust
/// use conedb_core::events::Emitter;
/// use conedb_core::types::metadata;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Lifecycle {
///     Ready,
/// }
///
/// let emitter = Emitter::new();
/// emitter.on(Lifecycle::Ready, |event| {
///     println!("ready: {:?}", event.metadata);
/// });
/// emitter.emit(Lifecycle::Ready, metadata([("index", "idx1")]));
/// ```
pub struct Emitter<T> {
    registry: Mutex<Registry<T>>,
}

impl<T: Eq + Hash + Copy> Emitter<T> {
    /// Create an empty emitter.
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Register a listener for `event_type`.
    ///
    /// Listeners are invoked in registration order. Duplicate registrations
    /// are kept as-is; there is no deduplication.
    pub fn on<F>(&self, event_type: T, listener: F)
    where
        F: Fn(&Event<T>) + Send + Sync + 'static,
    {
        let mut reg = self.registry.lock().expect("event registry poisoned");
        reg.listeners
            .entry(event_type)
            .or_default()
            .push(Arc::new(listener));
    }

    /// Append a filter to the chain for `event_type`.
    ///
    /// A filter may return a (possibly transformed) event to deliver, or
    /// `None` to veto delivery for its slot in the chain. Chains for
    /// different event types are independent.
    pub fn add_filter<F>(&self, event_type: T, filter: F)
    where
        F: Fn(&Event<T>) -> Option<Event<T>> + Send + Sync + 'static,
    {
        let mut reg = self.registry.lock().expect("event registry poisoned");
        reg.filters
            .entry(event_type)
            .or_default()
            .push(Arc::new(filter));
    }

    /// Mute `event_type`. Idempotent.
    pub fn mute(&self, event_type: T) {
        let mut reg = self.registry.lock().expect("event registry poisoned");
        reg.muted.insert(event_type);
    }

    /// Unmute `event_type`. Idempotent.
    pub fn unmute(&self, event_type: T) {
        let mut reg = self.registry.lock().expect("event registry poisoned");
        reg.muted.remove(&event_type);
    }

    /// Whether `event_type` is currently muted.
    pub fn is_muted(&self, event_type: T) -> bool {
        let reg = self.registry.lock().expect("event registry poisoned");
        reg.muted.contains(&event_type)
    }

    /// Emit an event with the given metadata.
    ///
    /// See the module docs for the delivery model. Returns after all
    /// listener invocations have completed.
    pub fn emit(&self, event_type: T, metadata: Metadata) {
        // Snapshot under the lock, invoke without it. The full listener map
        // is snapshotted because a filter may rewrite the event type and the
        // result is routed by the type it carries.
        let (listeners, filters) = {
            let reg = self.registry.lock().expect("event registry poisoned");
            if reg.muted.contains(&event_type) {
                return;
            }
            let filters = reg.filters.get(&event_type).cloned().unwrap_or_default();
            (reg.listeners.clone(), filters)
        };

        let event = Event {
            event_type,
            metadata,
        };

        if filters.is_empty() {
            notify(&listeners, &event);
        } else {
            for filter in &filters {
                if let Some(filtered) = filter(&event) {
                    notify(&listeners, &filtered);
                }
            }
        }
    }
}

impl<T: Eq + Hash + Copy> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn notify<T: Eq + Hash>(listeners: &HashMap<T, Vec<Listener<T>>>, event: &Event<T>) {
    if let Some(listeners) = listeners.get(&event.event_type) {
        for listener in listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{metadata, MetaValue};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestEvent {
        Ready,
        Failed,
    }

    type Seen = Arc<Mutex<Vec<Event<TestEvent>>>>;

    fn recording_listener(emitter: &Emitter<TestEvent>, event_type: TestEvent) -> Seen {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        emitter.on(event_type, move |event| {
            sink.lock().unwrap().push(event.clone());
        });
        seen
    }

    #[test]
    fn test_listener_receives_emitted_event() {
        let emitter = Emitter::new();
        let seen = recording_listener(&emitter, TestEvent::Ready);

        emitter.emit(TestEvent::Ready, metadata([("id", "idx1")]));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].event_type, TestEvent::Ready);
        assert_eq!(seen[0].metadata.get("id"), Some(&MetaValue::from("idx1")));
    }

    #[test]
    fn test_no_filters_single_delivery() {
        let emitter = Emitter::new();
        let first = recording_listener(&emitter, TestEvent::Ready);
        let second = recording_listener(&emitter, TestEvent::Ready);

        emitter.emit(TestEvent::Ready, Metadata::new());

        assert_eq!(first.lock().unwrap().len(), 1);
        assert_eq!(second.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_events_routed_by_type() {
        let emitter = Emitter::new();
        let ready = recording_listener(&emitter, TestEvent::Ready);
        let failed = recording_listener(&emitter, TestEvent::Failed);

        emitter.emit(TestEvent::Ready, Metadata::new());

        assert_eq!(ready.lock().unwrap().len(), 1);
        assert!(failed.lock().unwrap().is_empty());
    }

    #[test]
    fn test_mute_suppresses_everything() {
        let emitter = Emitter::new();
        let seen = recording_listener(&emitter, TestEvent::Ready);
        let filter_calls = Arc::new(Mutex::new(0usize));
        let calls = filter_calls.clone();
        emitter.add_filter(TestEvent::Ready, move |event| {
            *calls.lock().unwrap() += 1;
            Some(event.clone())
        });

        emitter.mute(TestEvent::Ready);
        emitter.emit(TestEvent::Ready, Metadata::new());

        assert!(seen.lock().unwrap().is_empty());
        // Filters must not run for a muted type.
        assert_eq!(*filter_calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_mute_then_unmute() {
        let emitter = Emitter::new();
        let seen = recording_listener(&emitter, TestEvent::Ready);

        emitter.mute(TestEvent::Ready);
        emitter.emit(TestEvent::Ready, Metadata::new());
        emitter.unmute(TestEvent::Ready);
        emitter.emit(TestEvent::Ready, Metadata::new());

        // Only the post-unmute emit is delivered.
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_mute_is_idempotent() {
        let emitter = Emitter::new();
        emitter.mute(TestEvent::Ready);
        emitter.mute(TestEvent::Ready);
        assert!(emitter.is_muted(TestEvent::Ready));
        emitter.unmute(TestEvent::Ready);
        assert!(!emitter.is_muted(TestEvent::Ready));
        emitter.unmute(TestEvent::Ready);
        assert!(!emitter.is_muted(TestEvent::Ready));
    }

    #[test]
    fn test_filter_veto_blocks_delivery() {
        let emitter = Emitter::new();
        let seen = recording_listener(&emitter, TestEvent::Ready);
        emitter.add_filter(TestEvent::Ready, |_| None);

        emitter.emit(TestEvent::Ready, metadata([("id", "idx1")]));

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_filter_transforms_event() {
        let emitter = Emitter::new();
        let seen = recording_listener(&emitter, TestEvent::Ready);
        emitter.add_filter(TestEvent::Ready, |event| {
            let mut modified = event.clone();
            modified
                .metadata
                .insert("modified".to_string(), MetaValue::from(true));
            Some(modified)
        });

        emitter.emit(TestEvent::Ready, metadata([("id", "idx1")]));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].metadata.get("modified"), Some(&MetaValue::from(true)));
        assert_eq!(seen[0].metadata.get("id"), Some(&MetaValue::from("idx1")));
    }

    #[test]
    fn test_two_surviving_filters_deliver_twice() {
        let emitter = Emitter::new();
        let seen = recording_listener(&emitter, TestEvent::Ready);
        emitter.add_filter(TestEvent::Ready, |event| {
            let mut ev = event.clone();
            ev.metadata.insert("filter".to_string(), MetaValue::from(1i64));
            Some(ev)
        });
        emitter.add_filter(TestEvent::Ready, |event| {
            let mut ev = event.clone();
            ev.metadata.insert("filter".to_string(), MetaValue::from(2i64));
            Some(ev)
        });

        emitter.emit(TestEvent::Ready, Metadata::new());

        // One notification round per surviving filter, each carrying that
        // filter's result, in registration order.
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].metadata.get("filter"), Some(&MetaValue::from(1i64)));
        assert_eq!(seen[1].metadata.get("filter"), Some(&MetaValue::from(2i64)));
    }

    #[test]
    fn test_filters_see_original_event() {
        // Filters are applied to the original emit-time event, not the
        // previous filter's output.
        let emitter = Emitter::new();
        let seen = recording_listener(&emitter, TestEvent::Ready);
        emitter.add_filter(TestEvent::Ready, |event| {
            let mut ev = event.clone();
            ev.metadata.insert("first".to_string(), MetaValue::from(true));
            Some(ev)
        });
        emitter.add_filter(TestEvent::Ready, |event| {
            assert!(event.metadata.get("first").is_none());
            Some(event.clone())
        });

        emitter.emit(TestEvent::Ready, Metadata::new());
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_veto_only_skips_that_filters_round() {
        let emitter = Emitter::new();
        let seen = recording_listener(&emitter, TestEvent::Ready);
        emitter.add_filter(TestEvent::Ready, |_| None);
        emitter.add_filter(TestEvent::Ready, |event| Some(event.clone()));

        emitter.emit(TestEvent::Ready, Metadata::new());

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_filter_may_redirect_event_type() {
        // A filter that rewrites the event type routes its result to the
        // new type's listeners, not the emitted type's.
        let emitter = Emitter::new();
        let ready = recording_listener(&emitter, TestEvent::Ready);
        let failed = recording_listener(&emitter, TestEvent::Failed);
        emitter.add_filter(TestEvent::Ready, |event| {
            let mut redirected = event.clone();
            redirected.event_type = TestEvent::Failed;
            Some(redirected)
        });

        emitter.emit(TestEvent::Ready, metadata([("id", "idx1")]));

        assert!(ready.lock().unwrap().is_empty());
        let failed = failed.lock().unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].event_type, TestEvent::Failed);
        assert_eq!(failed[0].metadata.get("id"), Some(&MetaValue::from("idx1")));
    }

    #[test]
    fn test_filter_chains_independent_per_type() {
        let emitter = Emitter::new();
        let failed = recording_listener(&emitter, TestEvent::Failed);
        emitter.add_filter(TestEvent::Ready, |_| None);

        emitter.emit(TestEvent::Failed, Metadata::new());

        assert_eq!(failed.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_listener_order_is_registration_order() {
        let emitter = Emitter::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let order = order.clone();
            emitter.on(TestEvent::Ready, move |_| {
                order.lock().unwrap().push(tag);
            });
        }

        emitter.emit(TestEvent::Ready, Metadata::new());

        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_listener_may_reenter_emitter() {
        let emitter = Arc::new(Emitter::new());
        let seen = recording_listener(&emitter, TestEvent::Failed);
        let reentrant = emitter.clone();
        emitter.on(TestEvent::Ready, move |_| {
            reentrant.emit(TestEvent::Failed, Metadata::new());
        });

        emitter.emit(TestEvent::Ready, Metadata::new());

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let emitter: Emitter<TestEvent> = Emitter::new();
        emitter.emit(TestEvent::Ready, Metadata::new());
    }
}
