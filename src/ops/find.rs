use std::rc::Rc;

use crate::{ops::lift, prelude::*};

/// Emits every value for which `pred` holds.
///
/// Unlike a single-result "find", the stream does not stop after the first
/// match: every matching value is forwarded and the output completes only
/// when the source does. Use `.find(p).take(1)` for the first match alone.
pub fn find<A, E, P>(pred: P) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: 'static,
  E: 'static,
  P: Fn(&A) -> bool + 'static,
{
  let pred = Rc::new(pred);
  move |source| {
    lift(source, move |subscriber, _| {
      let (pred, downstream) = (pred.clone(), subscriber.clone());
      subscriber.forward_with(move |v: A| {
        if pred(&v) {
          downstream.next(v)
        }
      })
    })
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn find(self, pred: impl Fn(&A) -> bool + 'static) -> Observable<A, E> {
    self.pipe(find(pred))
  }
}
