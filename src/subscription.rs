//! The handle returned by `subscribe`.
//!
//! A [`Subscription`] owns a list of attachments: the observer bindings it
//! created itself plus any child subscriptions merged in with
//! [`Subscription::add`]. It offers two ways to end them:
//!
//! - [`Subscription::unsubscribe`] is the public detach. Each held observer is
//!   marked done and removed from its registry without any callback firing.
//!   The producer is torn down once its registry has no observer left.
//! - `release` is crate-internal. It marks the observer done and resets the
//!   producer unconditionally, which is how cancelling operators such as
//!   `take` free an upstream they no longer want.

use std::{
  cell::RefCell,
  fmt::{Debug, Formatter},
  mem,
  rc::Rc,
};

use smallvec::SmallVec;

/// Something a subscription can end.
pub(crate) trait Attachment {
  /// Voluntary detach.
  fn detach(&self);
  /// Forced teardown of the owning producer.
  fn release(&self);
  fn is_closed(&self) -> bool;
}

#[derive(Default)]
struct Inner {
  closed: bool,
  attachments: SmallVec<[Rc<dyn Attachment>; 1]>,
}

/// Cancellable handle to one or more live subscriptions.
///
/// Cloning shares the handle.
#[derive(Clone, Default)]
pub struct Subscription(Rc<RefCell<Inner>>);

impl Subscription {
  pub(crate) fn attach(&self, attachment: Rc<dyn Attachment>) {
    if self.0.borrow().closed {
      attachment.detach();
      return;
    }
    let mut inner = self.0.borrow_mut();
    inner.attachments.retain(|a| !a.is_closed());
    inner.attachments.push(attachment);
  }

  /// Merges `child` into this handle, so unsubscribing this handle also
  /// unsubscribes `child`. A child added to an already closed handle is
  /// unsubscribed immediately.
  pub fn add(&self, child: Subscription) {
    if Rc::ptr_eq(&self.0, &child.0) {
      return;
    }
    self.attach(Rc::new(child));
  }

  /// Detaches every held observer. No `error`/`complete` callback fires.
  ///
  /// Calling this again, or after the stream already terminated, does
  /// nothing.
  pub fn unsubscribe(&self) {
    for attachment in self.take_attachments() {
      attachment.detach();
    }
  }

  /// Forced teardown: closes every held observer and resets its producer
  /// even if other observers were still attached to it.
  pub(crate) fn release(&self) {
    for attachment in self.take_attachments() {
      attachment.release();
    }
  }

  /// `true` after `unsubscribe`, or once every held observer has terminated.
  pub fn is_closed(&self) -> bool {
    let inner = self.0.borrow();
    inner.closed || (!inner.attachments.is_empty() && inner.attachments.iter().all(|a| a.is_closed()))
  }

  /// Activates "RAII" behavior for this subscription: `unsubscribe()` is
  /// called as soon as the returned guard goes out of scope.
  ///
  /// **Attention:** if the return value is not bound to a variable it is
  /// dropped, and the subscription ended, immediately.
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard { SubscriptionGuard(self) }

  fn take_attachments(&self) -> SmallVec<[Rc<dyn Attachment>; 1]> {
    let mut inner = self.0.borrow_mut();
    inner.closed = true;
    mem::take(&mut inner.attachments)
  }
}

impl Attachment for Subscription {
  fn detach(&self) { self.unsubscribe() }

  fn release(&self) { Subscription::release(self) }

  fn is_closed(&self) -> bool { Subscription::is_closed(self) }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription")
      .field("is_closed", &self.is_closed())
      .field("attachments", &self.0.borrow().attachments.len())
      .finish()
  }
}

/// An RAII scope for a subscription: dropping the guard unsubscribes.
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
  pub fn new(subscription: Subscription) -> Self { Self(subscription) }

  /// The guarded subscription.
  pub fn subscription(&self) -> &Subscription { &self.0 }
}

impl Drop for SubscriptionGuard {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}

#[cfg(test)]
mod tests {
  use std::cell::{Cell, RefCell};

  use super::*;
  use crate::prelude::*;

  #[rxlite_macro::test]
  fn add_merges_children() {
    let parent = Subscription::default();
    parent.add(Subscription::default());
    parent.add(Subscription::default());
    parent.add(parent.clone());
    assert_eq!(parent.0.borrow().attachments.len(), 2);

    parent.unsubscribe();
    assert!(parent.is_closed());
    assert!(parent.0.borrow().attachments.is_empty());
  }

  #[rxlite_macro::test]
  fn child_added_after_close_is_unsubscribed() {
    let parent = Subscription::default();
    parent.unsubscribe();
    let child = Subscription::default();
    parent.add(child.clone());
    assert!(child.is_closed());
  }

  #[rxlite_macro::test]
  fn unsubscribe_detaches_without_callbacks() {
    let torn_down = Rc::new(Cell::new(0));
    let completed = Rc::new(Cell::new(false));
    let t = torn_down.clone();
    let source = Observable::<i32>::new(move |_subscriber| {
      let t = t.clone();
      Teardown::new(move || t.set(t.get() + 1))
    });

    let c = completed.clone();
    let subscription = source.subscribe(ObserverFns::new().on_complete(move || c.set(true)));
    assert!(!subscription.is_closed());

    subscription.unsubscribe();
    subscription.unsubscribe();
    assert!(subscription.is_closed());
    assert!(!completed.get());
    assert_eq!(torn_down.get(), 1);
  }

  #[rxlite_macro::test]
  fn unsubscribe_after_complete_is_a_noop() {
    let torn_down = Rc::new(Cell::new(0));
    let t = torn_down.clone();
    let source = Observable::<i32>::new(move |subscriber| {
      subscriber.next(1);
      subscriber.complete();
      let t = t.clone();
      Teardown::new(move || t.set(t.get() + 1))
    });

    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    let subscription = source.subscribe(move |v| s.borrow_mut().push(v));
    assert!(subscription.is_closed());
    assert_eq!(torn_down.get(), 1);

    subscription.unsubscribe();
    assert_eq!(torn_down.get(), 1);
    assert_eq!(*seen.borrow(), vec![1]);
  }

  #[rxlite_macro::test]
  fn guard_unsubscribes_on_drop() {
    let torn_down = Rc::new(Cell::new(false));
    let t = torn_down.clone();
    let source = Observable::<()>::new(move |_| {
      let t = t.clone();
      Teardown::new(move || t.set(true))
    });
    {
      let guard = source.subscribe(|_| {}).unsubscribe_when_dropped();
      assert!(!guard.subscription().is_closed());
    }
    assert!(torn_down.get());
  }
}
