use crate::prelude::*;

/// Mirrors the source until `notifier` emits its first value, then completes
/// and releases both the source and the notifier.
///
/// Errors and completion of the notifier are ignored.
///
/// ```
/// use rxlite::prelude::*;
/// use std::rc::Rc;
///
/// TestScheduler::init();
/// let stop = Rc::new(EventTarget::<()>::new());
/// observable::interval(Duration::from_millis(10), TestScheduler)
///   .unwrap()
///   .take_until(observable::from_event(stop.clone(), "click"))
///   .subscribe(|v| println!("{v}"));
///
/// TestScheduler::advance_by(Duration::from_millis(25));
/// stop.dispatch("click", ());
/// assert!(TestScheduler::is_empty());
/// assert_eq!(stop.listener_count("click"), 0);
/// ```
pub fn take_until<A, E, N, NE>(
  notifier: Observable<N, NE>,
) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: 'static,
  E: 'static,
  N: 'static,
  NE: 'static,
{
  move |source| {
    Observable::new(move |subscriber| {
      let downstream = subscriber.clone();
      let main = source.subscribe(subscriber.forward_with(move |v: A| downstream.next(v)));

      let stop = if subscriber.is_closed() {
        Subscription::default()
      } else {
        let main = main.clone();
        notifier.subscribe_with(move |notice| {
          let notice = notice.clone();
          move |_: N| {
            subscriber.complete();
            main.release();
            notice.release();
          }
        })
      };

      Teardown::new(move || {
        main.unsubscribe();
        stop.unsubscribe();
      })
    })
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn take_until<N: 'static, NE: 'static>(self, notifier: Observable<N, NE>) -> Observable<A, E> {
    self.pipe(take_until(notifier))
  }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    rc::Rc,
  };

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn stops_on_first_notification() {
    let source = Rc::new(EventTarget::<i32>::new());
    let stop = Rc::new(EventTarget::<()>::new());
    let log = Rc::new(RefCell::new(vec![]));
    let (n, c) = (log.clone(), log.clone());

    observable::from_event(source.clone(), "v")
      .take_until(observable::from_event(stop.clone(), "stop"))
      .subscribe(
        ObserverFns::new()
          .on_next(move |v: i32| n.borrow_mut().push(v.to_string()))
          .on_complete(move || c.borrow_mut().push("complete".to_string())),
      );

    source.dispatch("v", 1);
    source.dispatch("v", 2);
    stop.dispatch("stop", ());
    source.dispatch("v", 3);

    assert_eq!(*log.borrow(), vec!["1", "2", "complete"]);
    assert_eq!(source.listener_count("v"), 0);
    assert_eq!(stop.listener_count("stop"), 0);
  }

  #[rxlite_macro::test]
  fn notifier_errors_are_ignored() {
    let completed = Rc::new(Cell::new(false));
    let c = completed.clone();
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    of!(1, 2)
      .take_until(throw_err::<(), _>("ignored"))
      .subscribe(ObserverFns::new().on_next(move |v| s.borrow_mut().push(v)).on_complete(move || c.set(true)));
    assert_eq!(*seen.borrow(), vec![1, 2]);
    assert!(completed.get());
  }

  #[rxlite_macro::test]
  fn unsubscribe_detaches_both() {
    let source = Rc::new(EventTarget::<i32>::new());
    let stop = Rc::new(EventTarget::<()>::new());
    let subscription = observable::from_event(source.clone(), "v")
      .take_until(observable::from_event(stop.clone(), "stop"))
      .subscribe(|_| {});
    assert_eq!(stop.listener_count("stop"), 1);

    subscription.unsubscribe();
    assert_eq!(source.listener_count("v"), 0);
    assert_eq!(stop.listener_count("stop"), 0);
  }
}
