//! Observer shapes accepted by `subscribe`, and the record they are
//! normalised into.
//!
//! A consumer can hand `subscribe` either a plain value callback or an
//! [`ObserverFns`] record with any subset of `next` / `error` / `complete`.
//! Both forms are resolved once, at subscribe time, into an
//! [`ObserverRecord`] that also carries the `done` flag.

use std::{
  cell::{Cell, RefCell},
  collections::VecDeque,
};

// ============================================================================
// Observer Functions
// ============================================================================

/// A structured observer: optional callbacks for each event kind.
///
/// Missing callbacks are simply skipped when the matching event arrives.
///
/// ```rust
/// use rxlite::prelude::*;
///
/// let observer = ObserverFns::new()
///   .on_next(|v: i32| println!("value {v}"))
///   .on_error(|e: String| println!("error {e}"))
///   .on_complete(|| println!("done"));
/// rxlite::of!(1, 2, 3).with_err::<String>().subscribe(observer);
/// ```
pub struct ObserverFns<Item, Err> {
  pub(crate) next: Option<Box<dyn FnMut(Item)>>,
  pub(crate) error: Option<Box<dyn FnOnce(Err)>>,
  pub(crate) complete: Option<Box<dyn FnOnce()>>,
}

impl<Item, Err> Default for ObserverFns<Item, Err> {
  fn default() -> Self { Self { next: None, error: None, complete: None } }
}

impl<Item, Err> ObserverFns<Item, Err> {
  pub fn new() -> Self { Self::default() }

  pub fn on_next(mut self, next: impl FnMut(Item) + 'static) -> Self {
    self.next = Some(Box::new(next));
    self
  }

  pub fn on_error(mut self, error: impl FnOnce(Err) + 'static) -> Self {
    self.error = Some(Box::new(error));
    self
  }

  pub fn on_complete(mut self, complete: impl FnOnce() + 'static) -> Self {
    self.complete = Some(Box::new(complete));
    self
  }
}

// ============================================================================
// IntoObserver Trait
// ============================================================================

/// Anything `subscribe` accepts as an observer.
///
/// Implemented for value closures (`|v| ...`), which only observe `next`,
/// and for [`ObserverFns`].
pub trait IntoObserver<Item, Err> {
  fn into_observer(self) -> ObserverFns<Item, Err>;
}

impl<Item, Err, F> IntoObserver<Item, Err> for F
where
  F: FnMut(Item) + 'static,
{
  fn into_observer(self) -> ObserverFns<Item, Err> { ObserverFns::new().on_next(self) }
}

impl<Item, Err> IntoObserver<Item, Err> for ObserverFns<Item, Err> {
  #[inline]
  fn into_observer(self) -> ObserverFns<Item, Err> { self }
}

// ============================================================================
// ObserverRecord - normalised observer with terminal flag
// ============================================================================

/// An event held back because the record was busy delivering.
enum Queued<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

/// The normalised observer held by a subscription's registry.
///
/// Once `done` is set no callback fires again, and all callbacks are dropped
/// so whatever they captured is released. `stopped` turns true as soon as a
/// terminal event is accepted, which may be before it is delivered.
pub(crate) struct ObserverRecord<Item, Err> {
  done: Cell<bool>,
  stopped: Cell<bool>,
  delivering: Cell<bool>,
  pending: RefCell<VecDeque<Queued<Item, Err>>>,
  next: RefCell<Option<Box<dyn FnMut(Item)>>>,
  error: RefCell<Option<Box<dyn FnOnce(Err)>>>,
  complete: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl<Item, Err> ObserverRecord<Item, Err> {
  /// A record with no callbacks yet; see [`ObserverRecord::install`].
  pub(crate) fn empty() -> Self {
    Self {
      done: Cell::new(false),
      stopped: Cell::new(false),
      delivering: Cell::new(false),
      pending: RefCell::new(VecDeque::new()),
      next: RefCell::new(None),
      error: RefCell::new(None),
      complete: RefCell::new(None),
    }
  }

  pub(crate) fn install(&self, fns: ObserverFns<Item, Err>) {
    if self.done.get() {
      return;
    }
    let ObserverFns { next, error, complete } = fns;
    *self.next.borrow_mut() = next;
    *self.error.borrow_mut() = error;
    *self.complete.borrow_mut() = complete;
  }

  #[inline]
  pub(crate) fn is_done(&self) -> bool { self.done.get() }

  /// `true` once a terminal event was accepted or the record was closed.
  #[inline]
  pub(crate) fn is_stopped(&self) -> bool { self.stopped.get() }

  /// Marks the record terminal without invoking any callback.
  pub(crate) fn close(&self) {
    self.done.set(true);
    self.stopped.set(true);
    self.drop_callbacks();
  }

  /// Delivers `value` unless the record is stopped.
  ///
  /// Events arriving while a previous value is still being delivered (the
  /// callback re-entered its own source) are queued and delivered in order
  /// once the current call returns, terminal events included. Returns `true`
  /// when a queued terminal event was delivered by this call, so the caller
  /// can finish the teardown the re-entrant caller could not.
  pub(crate) fn deliver_next(&self, value: Item) -> bool {
    if self.stopped.get() {
      return false;
    }
    if self.delivering.get() {
      self.pending.borrow_mut().push_back(Queued::Next(value));
      return false;
    }
    self.delivering.set(true);
    let mut current = Some(Queued::Next(value));
    let mut terminated = false;
    loop {
      let event = match current.take() {
        Some(event) => event,
        None => {
          let queued = self.pending.borrow_mut().pop_front();
          match queued {
            Some(event) => event,
            None => break,
          }
        }
      };
      if self.done.get() {
        break;
      }
      match event {
        Queued::Next(value) => {
          let callback = self.next.borrow_mut().take();
          if let Some(mut callback) = callback {
            callback(value);
            if !self.done.get() {
              *self.next.borrow_mut() = Some(callback);
            }
          }
        }
        Queued::Error(err) => {
          terminated = self.finish_error(err);
          break;
        }
        Queued::Complete => {
          terminated = self.finish_complete();
          break;
        }
      }
    }
    self.delivering.set(false);
    if self.done.get() {
      self.pending.borrow_mut().clear();
    }
    terminated
  }

  /// Delivers `err` and marks the record done. Returns `false` when the
  /// record had already stopped, or when the error was queued behind a
  /// delivery in progress.
  pub(crate) fn deliver_error(&self, err: Err) -> bool {
    if self.stopped.replace(true) {
      return false;
    }
    if self.delivering.get() {
      self.pending.borrow_mut().push_back(Queued::Error(err));
      return false;
    }
    self.finish_error(err)
  }

  /// Delivers completion and marks the record done; see
  /// [`ObserverRecord::deliver_error`] for the return value.
  pub(crate) fn deliver_complete(&self) -> bool {
    if self.stopped.replace(true) {
      return false;
    }
    if self.delivering.get() {
      self.pending.borrow_mut().push_back(Queued::Complete);
      return false;
    }
    self.finish_complete()
  }

  fn finish_error(&self, err: Err) -> bool {
    if self.done.replace(true) {
      return false;
    }
    let callback = self.error.borrow_mut().take();
    self.drop_callbacks();
    if let Some(callback) = callback {
      callback(err);
    }
    true
  }

  fn finish_complete(&self) -> bool {
    if self.done.replace(true) {
      return false;
    }
    let callback = self.complete.borrow_mut().take();
    self.drop_callbacks();
    if let Some(callback) = callback {
      callback();
    }
    true
  }

  fn drop_callbacks(&self) {
    // Callbacks may own subscriptions whose drop re-enters this record, so
    // move them out before dropping.
    let next = self.next.borrow_mut().take();
    let error = self.error.borrow_mut().take();
    let complete = self.complete.borrow_mut().take();
    drop((next, error, complete));
    self.pending.borrow_mut().clear();
  }
}

// ============================================================================
// Tests
// ============================================================================
