use std::{cell::RefCell, mem, rc::Rc};

use crate::prelude::*;

/// Buffers every value and emits them as one `Vec` when the source completes.
pub fn to_array<A, E>() -> impl FnOnce(Observable<A, E>) -> Observable<Vec<A>, E>
where
  A: 'static,
  E: 'static,
{
  move |source| {
    Observable::new(move |subscriber: Subscriber<Vec<A>, E>| {
      let buffer = Rc::new(RefCell::new(Vec::new()));
      let push = buffer.clone();
      let (error, complete) = (subscriber.clone(), subscriber);
      Teardown::from(
        source.subscribe(
          ObserverFns::new()
            .on_next(move |v| push.borrow_mut().push(v))
            .on_error(move |e| error.error(e))
            .on_complete(move || {
              let collected = mem::take(&mut *buffer.borrow_mut());
              complete.next(collected);
              complete.complete();
            }),
        ),
      )
    })
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn to_array(self) -> Observable<Vec<A>, E> { self.pipe(to_array()) }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn collects_on_complete() {
    TestScheduler::init();
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    observable::interval(Duration::from_millis(10), TestScheduler)
      .unwrap()
      .take(5)
      .map(|v| v as i64)
      .start_with(-1)
      .end_with(6)
      .to_array()
      .subscribe(move |v| s.borrow_mut().push(v));

    TestScheduler::advance_by(Duration::from_millis(40));
    assert!(seen.borrow().is_empty());
    TestScheduler::advance_by(Duration::from_millis(10));
    assert_eq!(*seen.borrow(), vec![vec![-1, 0, 1, 2, 3, 4, 6]]);
  }

  #[rxlite_macro::test]
  fn empty_source_emits_empty_vec() {
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    empty::<u8>().to_array().subscribe(move |v| s.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec![Vec::<u8>::new()]);
  }
}
