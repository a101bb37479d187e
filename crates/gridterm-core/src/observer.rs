//! Ordered observer lists for engine events.
//!
//! Each event kind owns one [`EventList`]. Handlers are stored behind `Arc`
//! so dispatch can iterate a snapshot of the list with the lock released:
//! a handler may subscribe or unsubscribe (itself or others) while it runs.
//! Changes made during a dispatch take effect from the next dispatch.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

/// Token returned by [`EventList::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

impl HandlerId {
    fn next() -> Self {
        Self(NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}

/// Ordered list of handlers for one event kind.
///
/// `F` is usually an unsized closure type such as
/// `dyn Fn(&PointerEvent) + Send + Sync`. Delivery order is registration order.
pub struct EventList<F: ?Sized> {
    handlers: Mutex<Vec<(HandlerId, Arc<F>)>>,
}

impl<F: ?Sized> EventList<F> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Append a handler and return its id.
    pub fn subscribe(&self, handler: Arc<F>) -> HandlerId {
        let id = HandlerId::next();
        self.handlers.lock().unwrap().push((id, handler));
        id
    }

    /// Remove a handler. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.lock().unwrap();
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        handlers.len() != before
    }

    /// Remove all handlers.
    pub fn clear(&self) {
        self.handlers.lock().unwrap().clear();
    }

    /// Number of subscribed handlers.
    pub fn len(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }

    /// True if no handler is subscribed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current handler list, in registration order.
    pub fn snapshot(&self) -> Vec<Arc<F>> {
        self.handlers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect()
    }
}

impl<A: ?Sized> EventList<dyn Fn(&A) + Send + Sync> {
    /// Invoke every handler with `args`. Returns the number of handlers called.
    pub fn emit(&self, args: &A) -> usize {
        let handlers = self.snapshot();
        for handler in &handlers {
            handler(args);
        }
        handlers.len()
    }
}

impl<F: ?Sized> Default for EventList<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> fmt::Debug for EventList<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventList")
            .field("handlers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    type Listener = dyn Fn(&u32) + Send + Sync;

    #[test]
    fn test_emit_in_registration_order() {
        let list: EventList<Listener> = EventList::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in 0..3u32 {
            let seen = Arc::clone(&seen);
            list.subscribe(Arc::new(move |value: &u32| {
                seen.lock().unwrap().push((tag, *value));
            }));
        }

        assert_eq!(list.emit(&7), 3);
        assert_eq!(*seen.lock().unwrap(), vec![(0, 7), (1, 7), (2, 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let list: EventList<Listener> = EventList::new();
        let id = list.subscribe(Arc::new(|_: &u32| {}));
        list.subscribe(Arc::new(|_: &u32| {}));

        assert_eq!(list.len(), 2);
        assert!(list.unsubscribe(id));
        assert!(!list.unsubscribe(id));
        assert_eq!(list.len(), 1);

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.emit(&1), 0);
    }

    #[test]
    fn test_handler_ids_are_unique() {
        let a: EventList<Listener> = EventList::new();
        let b: EventList<Listener> = EventList::new();
        let first = a.subscribe(Arc::new(|_: &u32| {}));
        let second = b.subscribe(Arc::new(|_: &u32| {}));
        assert_ne!(first, second);
        // An id from another list never removes anything here.
        assert!(!a.unsubscribe(second));
    }

    #[test]
    fn test_self_unsubscribe_during_emit() {
        let list: Arc<EventList<Listener>> = Arc::new(EventList::new());
        let calls = Arc::new(Mutex::new(0));
        let own_id: Arc<OnceLock<HandlerId>> = Arc::new(OnceLock::new());

        let handler = {
            let list = Arc::clone(&list);
            let calls = Arc::clone(&calls);
            let own_id = Arc::clone(&own_id);
            Arc::new(move |_: &u32| {
                *calls.lock().unwrap() += 1;
                if let Some(id) = own_id.get() {
                    list.unsubscribe(*id);
                }
            })
        };
        own_id.set(list.subscribe(handler)).unwrap();

        list.emit(&1);
        list.emit(&2);
        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(list.is_empty());
    }

    #[test]
    fn test_subscribe_during_emit_applies_next_time() {
        let list: Arc<EventList<Listener>> = Arc::new(EventList::new());
        let calls = Arc::new(Mutex::new(0));

        {
            let list_for_handler = Arc::clone(&list);
            let calls = Arc::clone(&calls);
            list.subscribe(Arc::new(move |_: &u32| {
                let calls = Arc::clone(&calls);
                list_for_handler.subscribe(Arc::new(move |_: &u32| {
                    *calls.lock().unwrap() += 1;
                }));
            }));
        }

        assert_eq!(list.emit(&0), 1);
        assert_eq!(*calls.lock().unwrap(), 0);
        assert_eq!(list.emit(&0), 2);
        assert_eq!(*calls.lock().unwrap(), 1);
    }
}
