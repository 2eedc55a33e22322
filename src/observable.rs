//! The observable primitive and its subscription protocol.
//!
//! An [`Observable`] is a reusable, inert description of a value sequence: a
//! producer function. Every call to `subscribe` creates a fresh session (one
//! observer registry plus the producer's teardown slot) and runs the producer
//! once, so two subscriptions never share state.
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! let numbers = observable::create(|subscriber: Subscriber<i32, String>| {
//!   subscriber.next(1);
//!   subscriber.next(2);
//!   subscriber.complete();
//!   Teardown::empty()
//! });
//!
//! numbers.subscribe_all(|v| println!("{v}"), |e| println!("error {e}"), || println!("done"));
//! ```

use std::{
  cell::RefCell,
  convert::Infallible,
  fmt::{Debug, Formatter},
  mem,
  rc::Rc,
};

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
  observer::{IntoObserver, ObserverFns, ObserverRecord},
  ops::Operator,
  scheduler::TaskHandle,
  subscription::{Attachment, Subscription},
};

mod from_event;
mod from_future;
mod from_iter;
mod interval;
mod of;
mod request;
mod timer;
mod trivial;

pub use from_event::*;
pub use from_future::*;
pub use from_iter::*;
pub use interval::*;
pub use request::*;
pub use timer::*;
pub use trivial::*;

type Producer<Item, Err> = dyn Fn(Subscriber<Item, Err>) -> Teardown;

// ============================================================================
// Observable
// ============================================================================

/// A push-based sequence of `Item`s that may fail with `Err`.
///
/// Cloning is cheap and shares the producer, not any subscription state.
pub struct Observable<Item, Err = Infallible> {
  producer: Rc<Producer<Item, Err>>,
}

impl<Item, Err> Clone for Observable<Item, Err> {
  fn clone(&self) -> Self { Self { producer: self.producer.clone() } }
}

impl<Item, Err> Debug for Observable<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str("Observable") }
}

/// Wraps a producer function into an [`Observable`]; same as
/// [`Observable::new`].
pub fn create<Item, Err, F>(producer: F) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
  F: Fn(Subscriber<Item, Err>) -> Teardown + 'static,
{
  Observable::new(producer)
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// `producer` runs once per subscription. It may emit synchronously and
  /// returns the teardown to run when that subscription ends.
  pub fn new(producer: impl Fn(Subscriber<Item, Err>) -> Teardown + 'static) -> Self {
    Self { producer: Rc::new(producer) }
  }

  /// Subscribes with a value callback or an [`ObserverFns`] record.
  pub fn subscribe(&self, observer: impl IntoObserver<Item, Err>) -> Subscription {
    self.subscribe_with(|_| observer)
  }

  /// Subscribes with all three callbacks.
  pub fn subscribe_all(
    &self, next: impl FnMut(Item) + 'static, error: impl FnOnce(Err) + 'static,
    complete: impl FnOnce() + 'static,
  ) -> Subscription {
    self.subscribe(ObserverFns::new().on_next(next).on_error(error).on_complete(complete))
  }

  /// Subscribes with an observer built from the subscription's own handle.
  ///
  /// The handle exists before the producer runs, so an operator can release
  /// its upstream from inside a synchronous emission.
  pub(crate) fn subscribe_with<O>(&self, make: impl FnOnce(&Subscription) -> O) -> Subscription
  where
    O: IntoObserver<Item, Err>,
  {
    let session = Rc::new(Session::new());
    let record = Rc::new(ObserverRecord::empty());
    session.registry.borrow_mut().add(record.clone());

    let subscription = Subscription::default();
    subscription.attach(Rc::new(Binding { session: session.clone(), record: record.clone() }));
    record.install(make(&subscription).into_observer());

    trace!("subscribe");
    let teardown = (self.producer)(Subscriber { record, session: session.clone() });
    session.install(teardown);
    subscription
  }

  /// Applies one operator.
  pub fn pipe<Out>(self, op: impl Operator<Self, Output = Out>) -> Out { op.apply(self) }

  /// Left-folds a list of same-typed operators; an empty list returns `self`.
  pub fn pipe_all<I>(self, ops: I) -> Self
  where
    I: IntoIterator<Item = Box<dyn FnOnce(Self) -> Self>>,
  {
    ops.into_iter().fold(self, |obs, op| op(obs))
  }
}

impl<Item: 'static> Observable<Item, Infallible> {
  /// Gives an infallible source any error type, so it composes with
  /// fallible ones.
  pub fn with_err<Err: 'static>(self) -> Observable<Item, Err> {
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      let (next, complete) = (subscriber.clone(), subscriber);
      Teardown::from(
        self.subscribe(
          ObserverFns::new()
            .on_next(move |v| next.next(v))
            .on_error(|e: Infallible| match e {})
            .on_complete(move || complete.complete()),
        ),
      )
    })
  }
}

// ============================================================================
// Teardown
// ============================================================================

/// Cleanup returned by a producer; run at most once, when its subscription
/// ends.
#[derive(Default)]
#[must_use]
pub struct Teardown(Option<Box<dyn FnOnce()>>);

impl Teardown {
  pub fn new(f: impl FnOnce() + 'static) -> Self { Self(Some(Box::new(f))) }

  /// Nothing to clean up.
  pub fn empty() -> Self { Self(None) }

  pub(crate) fn run(self) {
    if let Some(f) = self.0 {
      f();
    }
  }
}

impl From<Subscription> for Teardown {
  fn from(subscription: Subscription) -> Self { Teardown::new(move || subscription.unsubscribe()) }
}

impl From<TaskHandle> for Teardown {
  fn from(handle: TaskHandle) -> Self { Teardown::new(move || handle.cancel()) }
}

impl Debug for Teardown {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("Teardown").field(&self.0.is_some()).finish()
  }
}

// ============================================================================
// Session - per-subscription registry and teardown slot
// ============================================================================

/// Observers attached to one producer run.
pub(crate) struct Registry<Item, Err>(SmallVec<[Rc<ObserverRecord<Item, Err>>; 1]>);

impl<Item, Err> Registry<Item, Err> {
  fn new() -> Self { Self(SmallVec::new()) }

  pub(crate) fn add(&mut self, record: Rc<ObserverRecord<Item, Err>>) { self.0.push(record) }

  pub(crate) fn remove(&mut self, record: &Rc<ObserverRecord<Item, Err>>) {
    self.0.retain(|r| !Rc::ptr_eq(r, record))
  }

  pub(crate) fn contains(&self, record: &Rc<ObserverRecord<Item, Err>>) -> bool {
    self.0.iter().any(|r| Rc::ptr_eq(r, record))
  }

  pub(crate) fn len(&self) -> usize { self.0.len() }

  pub(crate) fn is_empty(&self) -> bool { self.0.is_empty() }

  fn clear(&mut self) -> SmallVec<[Rc<ObserverRecord<Item, Err>>; 1]> { mem::take(&mut self.0) }
}

enum TeardownSlot {
  /// The producer has not returned yet.
  Running,
  Installed(Teardown),
  Released,
}

pub(crate) struct Session<Item, Err> {
  pub(crate) registry: RefCell<Registry<Item, Err>>,
  teardown: RefCell<TeardownSlot>,
}

impl<Item, Err> Session<Item, Err> {
  fn new() -> Self {
    Self { registry: RefCell::new(Registry::new()), teardown: RefCell::new(TeardownSlot::Running) }
  }

  /// Stores the producer's teardown, or runs it right away when the session
  /// was reset while the producer was still running.
  fn install(&self, teardown: Teardown) {
    let released = matches!(*self.teardown.borrow(), TeardownSlot::Released);
    if released {
      trace!("late teardown");
      teardown.run();
    } else {
      *self.teardown.borrow_mut() = TeardownSlot::Installed(teardown);
    }
  }

  /// Runs the producer's teardown once and clears the registry, marking every
  /// remaining observer done.
  pub(crate) fn reset(&self) {
    let slot = self.teardown.replace(TeardownSlot::Released);
    if let TeardownSlot::Installed(teardown) = slot {
      trace!("teardown");
      teardown.run();
    }
    let records = self.registry.borrow_mut().clear();
    for record in records {
      record.close();
    }
  }
}

/// Ties one observer record to the session it is registered in.
struct Binding<Item, Err> {
  session: Rc<Session<Item, Err>>,
  record: Rc<ObserverRecord<Item, Err>>,
}

impl<Item, Err> Attachment for Binding<Item, Err> {
  fn detach(&self) {
    if self.record.is_done() {
      return;
    }
    self.record.close();
    let now_empty = {
      let mut registry = self.session.registry.borrow_mut();
      if registry.contains(&self.record) {
        registry.remove(&self.record);
      }
      trace!(observers = registry.len(), "detach");
      registry.is_empty()
    };
    if now_empty {
      self.session.reset();
    }
  }

  fn release(&self) {
    debug!("forced release of upstream");
    self.record.close();
    self.session.reset();
  }

  fn is_closed(&self) -> bool { self.record.is_done() }
}

// ============================================================================
// Subscriber - the dispatch trio handed to a producer
// ============================================================================

/// The `next` / `error` / `complete` functions a producer emits through,
/// bound to one observer.
///
/// Cloning is cheap, so timer and listener callbacks can each hold one.
pub struct Subscriber<Item, Err> {
  record: Rc<ObserverRecord<Item, Err>>,
  session: Rc<Session<Item, Err>>,
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  fn clone(&self) -> Self { Self { record: self.record.clone(), session: self.session.clone() } }
}

impl<Item, Err> Subscriber<Item, Err> {
  /// Delivers a value; ignored once the observer is done.
  ///
  /// An error or completion issued from inside the observer's own `next`
  /// callback is delivered after the values queued before it; the producer
  /// is torn down here once it has been.
  pub fn next(&self, value: Item) {
    if self.record.deliver_next(value) {
      self.session.reset();
    }
  }

  /// Delivers a terminal error and tears the producer down.
  pub fn error(&self, err: Err) {
    if self.record.deliver_error(err) {
      self.session.reset();
    }
  }

  /// Delivers completion and tears the producer down.
  pub fn complete(&self) {
    if self.record.deliver_complete() {
      self.session.reset();
    }
  }

  /// `true` once the observer terminated, was detached, or has a terminal
  /// event waiting behind a delivery in progress; producers stop emitting
  /// when this turns true.
  #[inline]
  pub fn is_closed(&self) -> bool { self.record.is_stopped() }
}

impl<Item: 'static, Err: 'static> Subscriber<Item, Err> {
  /// An upstream observer that runs `next` on each value and forwards
  /// `error` and `complete` to this subscriber unchanged.
  pub(crate) fn forward_with<A>(&self, next: impl FnMut(A) + 'static) -> ObserverFns<A, Err> {
    let (error, complete) = (self.clone(), self.clone());
    ObserverFns::new()
      .on_next(next)
      .on_error(move |err| error.error(err))
      .on_complete(move || complete.complete())
  }
}
