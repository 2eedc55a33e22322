//! The event-source collaborator.
//!
//! [`from_event`](crate::observable::from_event) only needs something that
//! can register and deregister a listener by event name. [`EventTarget`] is an
//! in-memory implementation for tests and for wiring host events in by hand.

use std::{
  cell::RefCell,
  collections::HashMap,
  fmt::{Debug, Formatter},
  rc::Rc,
};

use smallvec::SmallVec;
use tracing::trace;

/// A registered callback. Identity (`Rc::ptr_eq`) is what deregistration
/// matches on.
pub type Listener<Ev> = Rc<dyn Fn(Ev)>;

/// Anything that delivers named, discrete occurrences to listeners.
pub trait EventSource<Ev> {
  fn add_listener(&self, name: &str, listener: Listener<Ev>);

  /// Removes the listener that is `Rc::ptr_eq` to `listener`; unknown
  /// listeners are ignored.
  fn remove_listener(&self, name: &str, listener: &Listener<Ev>);
}

/// An in-memory event source.
pub struct EventTarget<Ev> {
  listeners: RefCell<HashMap<String, SmallVec<[Listener<Ev>; 2]>>>,
}

impl<Ev> Default for EventTarget<Ev> {
  fn default() -> Self { Self { listeners: RefCell::new(HashMap::new()) } }
}

impl<Ev> EventTarget<Ev> {
  pub fn new() -> Self { Self::default() }

  /// Number of listeners currently registered for `name`.
  pub fn listener_count(&self, name: &str) -> usize {
    self.listeners.borrow().get(name).map_or(0, |l| l.len())
  }
}

impl<Ev: Clone> EventTarget<Ev> {
  /// Calls every listener registered for `name` with a clone of `ev`.
  ///
  /// The listener list is snapshotted first, so listeners may add or remove
  /// listeners while being called.
  pub fn dispatch(&self, name: &str, ev: Ev) {
    let snapshot: SmallVec<[Listener<Ev>; 2]> =
      self.listeners.borrow().get(name).cloned().unwrap_or_default();
    trace!(name, listeners = snapshot.len(), "dispatch event");
    for listener in snapshot {
      listener(ev.clone());
    }
  }
}

impl<Ev> EventSource<Ev> for EventTarget<Ev> {
  fn add_listener(&self, name: &str, listener: Listener<Ev>) {
    self.listeners.borrow_mut().entry(name.to_string()).or_default().push(listener);
  }

  fn remove_listener(&self, name: &str, listener: &Listener<Ev>) {
    let mut listeners = self.listeners.borrow_mut();
    if let Some(registered) = listeners.get_mut(name) {
      registered.retain(|l| !Rc::ptr_eq(l, listener));
      if registered.is_empty() {
        listeners.remove(name);
      }
    }
  }
}

impl<Ev> Debug for EventTarget<Ev> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let counts: HashMap<String, usize> =
      self.listeners.borrow().iter().map(|(k, v)| (k.clone(), v.len())).collect();
    f.debug_struct("EventTarget").field("listeners", &counts).finish()
  }
}
