//! Synchronous publish/subscribe.
//!
//! An [`EventBus`] is embedded in every publisher. `publish` walks the
//! listeners registered at the moment of the call, in registration order,
//! on the caller's thread. There is no buffering, batching or deduplication.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

/// Failure reported by a listener while handling an event.
///
/// The bus logs it and keeps delivering to the remaining listeners.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ListenerError {
    pub message: String,
}

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type ListenerResult = Result<(), ListenerError>;

/// Capability to receive events of type `E` published by a source of type `S`.
///
/// `source` is the emitting object; listeners pull fresh state from it rather
/// than trusting the event payload for multi-field updates.
pub trait Listener<S: ?Sized, E> {
    fn update(&self, source: &S, event: &E) -> ListenerResult;
}

/// Adapts a closure into a [`Listener`].
pub struct FnListener<F>(F);

impl<S: ?Sized, E, F> Listener<S, E> for FnListener<F>
where
    F: Fn(&S, &E) -> ListenerResult,
{
    fn update(&self, source: &S, event: &E) -> ListenerResult {
        (self.0)(source, event)
    }
}

/// Wrap a closure as a shareable listener.
pub fn listener_fn<S: ?Sized, E, F>(f: F) -> Rc<FnListener<F>>
where
    F: Fn(&S, &E) -> ListenerResult,
{
    Rc::new(FnListener(f))
}

/// Ordered listener registry for one publisher.
pub struct EventBus<S: ?Sized, E> {
    listeners: RefCell<Vec<Rc<dyn Listener<S, E>>>>,
}

impl<S: ?Sized, E> Default for EventBus<S, E> {
    fn default() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl<S: ?Sized, E> fmt::Debug for EventBus<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<S: ?Sized, E> EventBus<S, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it receives every subsequent publish.
    pub fn subscribe(&self, listener: Rc<dyn Listener<S, E>>) {
        self.listeners.borrow_mut().push(listener);
    }

    /// Remove a listener by identity.
    ///
    /// Returns `false` (and does nothing) when it was never registered.
    pub fn unsubscribe(&self, listener: &dyn Listener<S, E>) -> bool {
        let target = listener as *const dyn Listener<S, E>;
        let mut listeners = self.listeners.borrow_mut();
        match listeners
            .iter()
            .position(|l| std::ptr::addr_eq(Rc::as_ptr(l), target))
        {
            Some(index) => {
                listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver `event` to every listener registered at the time of the call.
    ///
    /// The list is snapshotted first, so listeners may subscribe, unsubscribe
    /// or publish on other buses from inside `update`.
    pub fn publish(&self, source: &S, event: &E)
    where
        E: fmt::Debug,
    {
        let snapshot: Vec<_> = self.listeners.borrow().iter().cloned().collect();
        for (index, listener) in snapshot.iter().enumerate() {
            if let Err(err) = listener.update(source, event) {
                tracing::warn!(listener = index, ?event, %err, "listener failed, continuing delivery");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Source;

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        Hello(u32),
    }

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Listener<Source, Ping> for Recorder {
        fn update(&self, _source: &Source, event: &Ping) -> ListenerResult {
            let Ping::Hello(n) = event;
            self.log.borrow_mut().push(format!("{}:{n}", self.name));
            Ok(())
        }
    }

    fn recorder(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Rc<Recorder> {
        Rc::new(Recorder {
            name,
            log: Rc::clone(log),
        })
    }

    #[test]
    fn delivers_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let bus = EventBus::<Source, Ping>::new();
        bus.subscribe(recorder("a", &log));
        bus.subscribe(recorder("b", &log));
        bus.subscribe(recorder("c", &log));

        bus.publish(&Source, &Ping::Hello(1));

        assert_eq!(*log.borrow(), vec!["a:1", "b:1", "c:1"]);
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let bus = EventBus::<Source, Ping>::new();
        let a = recorder("a", &log);
        let b = recorder("b", &log);
        let c = recorder("c", &log);
        bus.subscribe(a.clone());
        bus.subscribe(b.clone());
        bus.subscribe(c.clone());

        assert!(bus.unsubscribe(&*b));
        bus.publish(&Source, &Ping::Hello(2));

        assert_eq!(*log.borrow(), vec!["a:2", "c:2"]);
        assert_eq!(bus.listener_count(), 2);
    }

    #[test]
    fn unsubscribe_unknown_is_noop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let bus = EventBus::<Source, Ping>::new();
        bus.subscribe(recorder("a", &log));

        let stranger = recorder("z", &log);
        assert!(!bus.unsubscribe(&*stranger));
        assert_eq!(bus.listener_count(), 1);
    }

    #[test]
    fn failing_listener_does_not_block_others() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let bus = EventBus::<Source, Ping>::new();
        bus.subscribe(listener_fn(|_: &Source, _: &Ping| {
            Err(ListenerError::new("broken view"))
        }));
        bus.subscribe(recorder("b", &log));

        bus.publish(&Source, &Ping::Hello(3));

        assert_eq!(*log.borrow(), vec!["b:3"]);
    }

    #[test]
    fn subscribing_during_publish_takes_effect_next_time() {
        let bus = Rc::new(EventBus::<Source, Ping>::new());
        let late_calls = Rc::new(Cell::new(0));

        let bus_handle = Rc::clone(&bus);
        let calls = Rc::clone(&late_calls);
        bus.subscribe(listener_fn(move |_: &Source, _: &Ping| {
            let calls = Rc::clone(&calls);
            bus_handle.subscribe(listener_fn(move |_: &Source, _: &Ping| {
                calls.set(calls.get() + 1);
                Ok(())
            }));
            Ok(())
        }));

        bus.publish(&Source, &Ping::Hello(1));
        assert_eq!(late_calls.get(), 0);
        assert_eq!(bus.listener_count(), 2);

        bus.publish(&Source, &Ping::Hello(2));
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn unsubscribing_self_during_publish_is_safe() {
        let bus = Rc::new(EventBus::<Source, Ping>::new());
        let calls = Rc::new(Cell::new(0));

        struct OneShot {
            bus: Rc<EventBus<Source, Ping>>,
            calls: Rc<Cell<u32>>,
        }

        impl Listener<Source, Ping> for OneShot {
            fn update(&self, _source: &Source, _event: &Ping) -> ListenerResult {
                self.calls.set(self.calls.get() + 1);
                self.bus.unsubscribe(self);
                Ok(())
            }
        }

        bus.subscribe(Rc::new(OneShot {
            bus: Rc::clone(&bus),
            calls: Rc::clone(&calls),
        }));

        bus.publish(&Source, &Ping::Hello(1));
        bus.publish(&Source, &Ping::Hello(2));

        assert_eq!(calls.get(), 1);
        assert_eq!(bus.listener_count(), 0);
    }
}
