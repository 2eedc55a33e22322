use crate::{ops::lift, prelude::*};

/// Emits only the first `count` values, then completes and releases the
/// upstream.
///
/// `take(0)` completes immediately without subscribing upstream at all.
///
/// # Example
///
/// ```
/// use rxlite::prelude::*;
///
/// from_iter(0..10).take(5).subscribe(|v| println!("{v}"));
///
/// // print logs:
/// // 0
/// // 1
/// // 2
/// // 3
/// // 4
/// ```
pub fn take<A, E>(count: usize) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: 'static,
  E: 'static,
{
  move |source| {
    if count == 0 {
      return Observable::new(|subscriber| {
        subscriber.complete();
        Teardown::empty()
      });
    }
    lift(source, move |subscriber, upstream| {
      let (downstream, upstream) = (subscriber.clone(), upstream.clone());
      let mut hits = 0;
      subscriber.forward_with(move |v: A| {
        hits += 1;
        downstream.next(v);
        if hits == count {
          downstream.complete();
          upstream.release();
        }
      })
    })
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn take(self, count: usize) -> Observable<A, E> { self.pipe(take(count)) }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn base_function() {
    let completed = Rc::new(Cell::new(0));
    let next_count = Rc::new(Cell::new(0));
    let (c, n) = (completed.clone(), next_count.clone());

    from_iter(0..100).take(5).subscribe(
      ObserverFns::new()
        .on_next(move |_| n.set(n.get() + 1))
        .on_complete(move || c.set(c.get() + 1)),
    );

    assert_eq!(completed.get(), 1);
    assert_eq!(next_count.get(), 5);
  }

  #[rxlite_macro::test]
  fn take_three_of_eight() {
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    from_iter(1..=8).take(3).subscribe(move |v| s.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
  }

  #[rxlite_macro::test]
  fn zero_completes_without_subscribing() {
    let subscribed = Rc::new(Cell::new(false));
    let completed = Rc::new(Cell::new(false));
    let s = subscribed.clone();
    let source = Observable::<i32>::new(move |subscriber| {
      s.set(true);
      subscriber.next(1);
      Teardown::empty()
    });

    let c = completed.clone();
    source
      .take(0)
      .subscribe(ObserverFns::new().on_next(|_| unreachable!()).on_complete(move || c.set(true)));
    assert!(completed.get());
    assert!(!subscribed.get());
  }

  #[rxlite_macro::test]
  fn releases_upstream_teardown() {
    TestScheduler::init();
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    observable::interval(Duration::from_millis(10), TestScheduler)
      .unwrap()
      .take(2)
      .subscribe(move |v| s.borrow_mut().push(v));

    TestScheduler::advance_by(Duration::from_millis(100));
    assert_eq!(*seen.borrow(), vec![0, 1]);
    assert!(TestScheduler::is_empty());
  }
}
