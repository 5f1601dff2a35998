//! Publish/subscribe channel for drag lifecycle signals.
//!
//! Decouples whoever starts a drag (the component menu or a block on the
//! canvas) from the history recorder that snapshots around it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Drag lifecycle signals. Pure synchronization, no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragSignal {
    Start,
    End,
}

impl DragSignal {
    /// Topic name as used on the wire and in logs.
    pub fn topic(self) -> &'static str {
        match self {
            DragSignal::Start => "dragstart",
            DragSignal::End => "dragend",
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct BusInner {
    listeners: Vec<(ListenerId, DragSignal, Listener)>,
    next_id: u64,
}

/// Event bus shared between the drag sources and the history engine.
///
/// Cloning yields another handle onto the same listener table.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.inner.borrow().listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one signal.
    pub fn subscribe(&self, signal: DragSignal, listener: impl Fn() + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, signal, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _, _)| *lid != id);
        inner.listeners.len() != before
    }

    /// Deliver a signal to every listener registered for it, in
    /// subscription order.
    pub fn emit(&self, signal: DragSignal) {
        // Snapshot first so listeners may (un)subscribe while running.
        let targets: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, s, _)| *s == signal)
            .map(|(_, _, l)| Rc::clone(l))
            .collect();
        log::debug!("bus: {} -> {} listener(s)", signal.topic(), targets.len());
        for listener in targets {
            listener();
        }
    }

    /// Number of listeners currently registered for a signal.
    pub fn listener_count(&self, signal: DragSignal) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|(_, s, _)| *s == signal)
            .count()
    }
}
