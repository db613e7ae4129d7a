//! Observer registry for inbound events.
//!
//! Handlers form an ordered sequence: insertion order determines dispatch
//! order, and removal deletes the first entry whose id matches. Dispatch
//! operates on a snapshot taken when the event arrives, so a handler that
//! adds or removes handlers while being invoked affects the next event,
//! never the current pass.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use authlink_protocol::TerminalEvent;

/// Event delivered to registered observers.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// A parsed event from the peripheral service.
    Terminal(TerminalEvent),

    /// An inbound frame that did not parse as any known event.
    ///
    /// The frame is dropped and the connection stays up; this variant is
    /// the only trace the owning application gets.
    MalformedMessage {
        /// Decode error description.
        error: String,
    },

    /// The transport connection came up.
    Connected,

    /// The transport connection went down. A reconnect attempt follows
    /// after the configured delay.
    Disconnected,
}

/// Identity of a registered handler, returned by registration and used for
/// removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Callback invoked once per client event, in registration order.
pub type EventHandler = Arc<dyn Fn(&ClientEvent) + Send + Sync>;

/// Ordered sequence of event handlers.
pub(crate) struct HandlerRegistry {
    handlers: Mutex<Vec<(HandlerId, EventHandler)>>,
    next_id: AtomicU64,
}

impl HandlerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Append a handler and return its id.
    pub(crate) fn add(&self, handler: EventHandler) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .lock()
            .expect("handler registry lock poisoned")
            .push((id, handler));
        id
    }

    /// Remove the first handler with the given id. No-op if absent.
    pub(crate) fn remove(&self, id: HandlerId) {
        let mut handlers = self
            .handlers
            .lock()
            .expect("handler registry lock poisoned");
        if let Some(index) = handlers.iter().position(|(handler_id, _)| *handler_id == id) {
            handlers.remove(index);
        }
    }

    /// Invoke every currently registered handler with the event, in
    /// registration order. The registry is snapshotted first; the lock is
    /// not held while handlers run.
    pub(crate) fn dispatch(&self, event: &ClientEvent) {
        let snapshot: Vec<EventHandler> = self
            .handlers
            .lock()
            .expect("handler registry lock poisoned")
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in snapshot {
            handler(event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.handlers
            .lock()
            .expect("handler registry lock poisoned")
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    fn recording_handler(log: &Arc<StdMutex<Vec<&'static str>>>, tag: &'static str) -> EventHandler {
        let log = Arc::clone(log);
        Arc::new(move |_event| {
            log.lock().unwrap().push(tag);
        })
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let registry = HandlerRegistry::new();
        let log = Arc::new(StdMutex::new(Vec::new()));

        registry.add(recording_handler(&log, "first"));
        registry.add(recording_handler(&log, "second"));
        registry.add(recording_handler(&log, "third"));

        registry.dispatch(&ClientEvent::Connected);

        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_register_unregister_replay() {
        let registry = HandlerRegistry::new();
        let log = Arc::new(StdMutex::new(Vec::new()));

        let a = registry.add(recording_handler(&log, "a"));
        let b = registry.add(recording_handler(&log, "b"));
        let c = registry.add(recording_handler(&log, "c"));
        assert_eq!(registry.len(), 3);

        registry.remove(b);
        assert_eq!(registry.len(), 2);

        registry.dispatch(&ClientEvent::Connected);
        assert_eq!(*log.lock().unwrap(), vec!["a", "c"]);

        registry.remove(a);
        registry.remove(c);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_remove_absent_handler_is_noop() {
        let registry = HandlerRegistry::new();
        let log = Arc::new(StdMutex::new(Vec::new()));

        let id = registry.add(recording_handler(&log, "only"));
        registry.remove(id);
        // Second removal of the same id must not disturb anything.
        registry.remove(id);
        assert_eq!(registry.len(), 0);

        let other = registry.add(recording_handler(&log, "other"));
        registry.remove(id);
        assert_eq!(registry.len(), 1);

        registry.dispatch(&ClientEvent::Connected);
        assert_eq!(*log.lock().unwrap(), vec!["other"]);

        registry.remove(other);
    }

    #[test]
    fn test_each_handler_invoked_exactly_once_per_event() {
        let registry = HandlerRegistry::new();
        let log = Arc::new(StdMutex::new(Vec::new()));

        registry.add(recording_handler(&log, "one"));
        registry.add(recording_handler(&log, "two"));
        registry.add(recording_handler(&log, "three"));

        registry.dispatch(&ClientEvent::Disconnected);
        registry.dispatch(&ClientEvent::Disconnected);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["one", "two", "three", "one", "two", "three"]
        );
    }

    #[test]
    fn test_removal_during_dispatch_takes_effect_next_pass() {
        let registry = Arc::new(HandlerRegistry::new());
        let log = Arc::new(StdMutex::new(Vec::new()));
        let victim_id = Arc::new(StdMutex::new(None::<HandlerId>));

        // First handler removes the one behind it mid-dispatch. The
        // snapshot taken at dispatch start still includes the victim for
        // this pass.
        let registry_ref = Arc::clone(&registry);
        let log_ref = Arc::clone(&log);
        let victim_ref = Arc::clone(&victim_id);
        registry.add(Arc::new(move |_event| {
            log_ref.lock().unwrap().push("remover");
            if let Some(id) = *victim_ref.lock().unwrap() {
                registry_ref.remove(id);
            }
        }));

        let victim = registry.add(recording_handler(&log, "victim"));
        *victim_id.lock().unwrap() = Some(victim);

        registry.dispatch(&ClientEvent::Connected);
        registry.dispatch(&ClientEvent::Connected);

        // Pass one sees both; pass two only the remover.
        assert_eq!(*log.lock().unwrap(), vec!["remover", "victim", "remover"]);
    }
}
