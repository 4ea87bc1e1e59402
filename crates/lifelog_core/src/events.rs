//! Explicit change notification for UI layers.
//!
//! # Responsibility
//! - Let a rendering layer subscribe to coarse "something changed" events and
//!   re-run its queries, instead of live-binding to persisted entities.
//!
//! # Invariants
//! - Single-threaded by design: the core runs on one foreground execution
//!   context, so `Rc`/`RefCell` is sufficient and no locking is needed.
//! - Events are emitted only after a mutation has been persisted.

use crate::model::travel::TripId;
use std::cell::RefCell;
use std::rc::Rc;

/// Coarse-grained change notification. Subscribers re-query what they render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// Catalog categories or templates changed.
    Catalog,
    /// A trip or its packing items changed.
    Trip(TripId),
    /// Meal log changed.
    Meals,
}

type Listener = Box<dyn Fn(&ChangeEvent)>;

/// Subscriber list shared by the mutating services.
#[derive(Default)]
pub struct ChangeBus {
    listeners: RefCell<Vec<Listener>>,
}

impl ChangeBus {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Registers a listener for all future events. Listeners cannot be
    /// removed individually; drop the bus to drop them all.
    pub fn subscribe(&self, listener: impl Fn(&ChangeEvent) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn emit(&self, event: ChangeEvent) {
        for listener in self.listeners.borrow().iter() {
            listener(&event);
        }
    }
}

/// Emits on an optional bus; services without a bus stay silent.
pub(crate) fn notify(bus: &Option<Rc<ChangeBus>>, event: ChangeEvent) {
    if let Some(bus) = bus {
        bus.emit(event);
    }
}
