//! TakeWhile operator implementation
//!
//! Emits values while a predicate holds. The first value that fails the
//! predicate is still emitted, then the stream completes and the upstream is
//! released.

use std::rc::Rc;

use crate::{ops::lift, prelude::*};

/// Forwards values while `pred` holds, plus the first value for which it
/// fails, then completes.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
/// use std::{cell::RefCell, rc::Rc};
///
/// let result = Rc::new(RefCell::new(Vec::new()));
/// let r = result.clone();
/// from_iter([1, 2, 3, 4, 5]).take_while(|v| *v < 3).subscribe(move |v| r.borrow_mut().push(v));
/// assert_eq!(*result.borrow(), vec![1, 2, 3]);
/// ```
pub fn take_while<A, E, P>(pred: P) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: 'static,
  E: 'static,
  P: Fn(&A) -> bool + 'static,
{
  let pred = Rc::new(pred);
  move |source| {
    lift(source, move |subscriber, upstream| {
      let (pred, downstream, upstream) = (pred.clone(), subscriber.clone(), upstream.clone());
      subscriber.forward_with(move |v: A| {
        let keep_going = pred(&v);
        downstream.next(v);
        if !keep_going {
          downstream.complete();
          upstream.release();
        }
      })
    })
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn take_while(self, pred: impl Fn(&A) -> bool + 'static) -> Observable<A, E> {
    self.pipe(take_while(pred))
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn inclusive_of_first_failure() {
    let log = Rc::new(RefCell::new(vec![]));
    let (n, c) = (log.clone(), log.clone());
    from_iter(0..).take_while(|v| *v < 2).subscribe(
      ObserverFns::new()
        .on_next(move |v: i32| n.borrow_mut().push(v.to_string()))
        .on_complete(move || c.borrow_mut().push("complete".to_string())),
    );
    assert_eq!(*log.borrow(), vec!["0", "1", "2", "complete"]);
  }

  #[rxlite_macro::test]
  fn source_completion_passes_through() {
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    of!(1, 2).take_while(|_| true).subscribe(move |v| s.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec![1, 2]);
  }
}
