use std::{cell::Cell, rc::Rc};

use smallvec::SmallVec;

use crate::prelude::*;

/// Subscribes to every source at once and forwards all of their values.
///
/// The first error from any source is propagated immediately and tears the
/// others down. The output completes once every source has completed; an
/// empty list completes right away.
///
/// ```
/// use rxlite::prelude::*;
///
/// let evens = from_iter((0..10).filter(|v| v % 2 == 0));
/// let odds = from_iter((0..10).filter(|v| v % 2 == 1));
/// let mut seen = vec![];
/// merge(vec![evens, odds]).subscribe(move |v| seen.push(v));
/// ```
pub fn merge<A, E>(sources: Vec<Observable<A, E>>) -> Observable<A, E>
where
  A: 'static,
  E: 'static,
{
  Observable::new(move |subscriber: Subscriber<A, E>| {
    let total = sources.len();
    if total == 0 {
      subscriber.complete();
      return Teardown::empty();
    }
    let completed = Rc::new(Cell::new(0));
    let mut inputs: SmallVec<[Subscription; 2]> = SmallVec::new();
    for source in &sources {
      if subscriber.is_closed() {
        break;
      }
      let (next, done, completed) = (subscriber.clone(), subscriber.clone(), completed.clone());
      let input = source.subscribe(subscriber.forward_with(move |v: A| next.next(v)).on_complete(
        move || {
          completed.set(completed.get() + 1);
          if completed.get() == total {
            done.complete();
          }
        },
      ));
      inputs.push(input);
    }
    Teardown::new(move || inputs.iter().for_each(Subscription::unsubscribe))
  })
}

impl<A: 'static, E: 'static> Observable<A, E> {
  /// Merges `self` with one more source; see [`merge`].
  pub fn merge(self, other: Observable<A, E>) -> Observable<A, E> { merge(vec![self, other]) }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn odd_even_merge() {
    let numbers = Rc::new(RefCell::new(vec![]));
    let n = numbers.clone();
    let evens = from_iter((0..10).filter(|v| v % 2 == 0));
    let odds = from_iter((0..10).filter(|v| v % 2 == 1));
    evens.merge(odds).subscribe(move |v| n.borrow_mut().push(v));
    assert_eq!(*numbers.borrow(), vec![0, 2, 4, 6, 8, 1, 3, 5, 7, 9]);
  }

  #[rxlite_macro::test]
  fn completes_after_every_source_completes() {
    TestScheduler::init();
    let log = Rc::new(RefCell::new(vec![]));
    let (n, c) = (log.clone(), log.clone());
    let every = |ms, count| {
      observable::interval(Duration::from_millis(ms), TestScheduler).unwrap().take(count)
    };
    merge(vec![every(10, 1), every(20, 2), every(100, 1)]).subscribe(
      ObserverFns::new()
        .on_next(move |v: usize| n.borrow_mut().push(v.to_string()))
        .on_complete(move || c.borrow_mut().push("complete".to_string())),
    );

    TestScheduler::advance_by(Duration::from_millis(50));
    assert_eq!(*log.borrow(), vec!["0", "0", "1"]);
    TestScheduler::advance_by(Duration::from_millis(50));
    assert_eq!(*log.borrow(), vec!["0", "0", "1", "0", "complete"]);
  }

  #[rxlite_macro::test]
  fn first_error_tears_down_the_rest() {
    TestScheduler::init();
    let errors = Rc::new(Cell::new(0));
    let e = errors.clone();
    let ticking = observable::interval(Duration::from_millis(10), TestScheduler).unwrap().with_err();
    merge(vec![ticking, throw_err("boom")]).subscribe_all(
      |_| {},
      move |_| e.set(e.get() + 1),
      || unreachable!(),
    );

    assert_eq!(errors.get(), 1);
    assert!(TestScheduler::is_empty());
  }

  #[rxlite_macro::test]
  fn empty_list_completes_immediately() {
    let completed = Rc::new(Cell::new(false));
    let c = completed.clone();
    merge(Vec::<Observable<i32>>::new()).subscribe_all(|_| {}, |_| {}, move || c.set(true));
    assert!(completed.get());
  }

  #[rxlite_macro::test]
  fn unsubscribe_releases_every_source() {
    TestScheduler::init();
    let a = observable::interval(Duration::from_millis(10), TestScheduler).unwrap();
    let b = observable::interval(Duration::from_millis(15), TestScheduler).unwrap();
    let subscription = a.merge(b).subscribe(|_| {});
    assert_eq!(TestScheduler::pending_count(), 2);
    subscription.unsubscribe();
    assert!(TestScheduler::is_empty());
  }
}
