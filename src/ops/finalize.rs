use std::rc::Rc;

use crate::{ops::lift, prelude::*};

/// Runs `callback` when the source errors, right before the error is
/// forwarded.
///
/// Normal completion and unsubscription do not run it.
pub fn finalize<A, E, F>(callback: F) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: 'static,
  E: 'static,
  F: Fn() + 'static,
{
  let callback = Rc::new(callback);
  move |source| {
    lift(source, move |subscriber, _| {
      let (next, error, callback) = (subscriber.clone(), subscriber.clone(), callback.clone());
      subscriber.forward_with(move |v: A| next.next(v)).on_error(move |e| {
        callback();
        error.error(e);
      })
    })
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn finalize<F: Fn() + 'static>(self, callback: F) -> Observable<A, E> {
    self.pipe(finalize(callback))
  }
}
