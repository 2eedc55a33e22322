//! Skip operator implementation
//!
//! Despite its name, `skip(n)` here forwards the *first* `n` values and drops
//! everything after them. This is the inverse of the conventional Rx
//! `skip`, which ignores the first `n`.

use crate::{ops::lift, prelude::*};

/// Forwards values while fewer than `count` have been seen, then drops the
/// rest. Completion and errors pass through unchanged, so unlike `take` the
/// upstream keeps running until it terminates on its own.
pub fn skip<A, E>(count: usize) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: 'static,
  E: 'static,
{
  move |source| {
    lift(source, move |subscriber, _| {
      let downstream = subscriber.clone();
      let mut index = 0;
      subscriber.forward_with(move |v: A| {
        if index < count {
          downstream.next(v);
        }
        index += 1;
      })
    })
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn skip(self, count: usize) -> Observable<A, E> { self.pipe(skip(count)) }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn forwards_only_the_first_count() {
    let log = Rc::new(RefCell::new(vec![]));
    let (n, c) = (log.clone(), log.clone());
    from_iter(1..=5).skip(2).subscribe(
      ObserverFns::new()
        .on_next(move |v: i32| n.borrow_mut().push(v.to_string()))
        .on_complete(move || c.borrow_mut().push("complete".to_string())),
    );
    assert_eq!(*log.borrow(), vec!["1", "2", "complete"]);
  }

  #[rxlite_macro::test]
  fn zero_forwards_nothing() {
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    of!(1, 2).skip(0).subscribe(move |v| s.borrow_mut().push(v));
    assert!(seen.borrow().is_empty());
  }
}
