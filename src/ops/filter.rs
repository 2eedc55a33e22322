use std::rc::Rc;

use crate::{ops::lift, prelude::*};

/// Emits only the values for which `pred` returns `true`.
///
/// ```
/// use rxlite::prelude::*;
///
/// from_iter(0..10).filter(|v| v % 2 == 0).subscribe(|v| println!("{v}"));
/// ```
pub fn filter<A, E, P>(pred: P) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
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
          downstream.next(v);
        }
      })
    })
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn filter(self, pred: impl Fn(&A) -> bool + 'static) -> Observable<A, E> {
    self.pipe(filter(pred))
  }
}
