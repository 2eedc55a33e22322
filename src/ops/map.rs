use std::rc::Rc;

use crate::{ops::lift, prelude::*};

/// Creates an operator which calls `f` on each value and emits its return.
///
/// Errors and completion pass through unchanged.
pub fn map<A, B, E, F>(f: F) -> impl FnOnce(Observable<A, E>) -> Observable<B, E>
where
  A: 'static,
  B: 'static,
  E: 'static,
  F: Fn(A) -> B + 'static,
{
  let f = Rc::new(f);
  move |source| {
    lift(source, move |subscriber, _| {
      let (f, downstream) = (f.clone(), subscriber.clone());
      subscriber.forward_with(move |v: A| downstream.next(f(v)))
    })
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  /// See [`map`](crate::ops::map()).
  pub fn map<B: 'static>(self, f: impl Fn(A) -> B + 'static) -> Observable<B, E> {
    self.pipe(map(f))
  }
}
