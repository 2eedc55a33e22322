use std::cell::Cell;

use crate::{error::ConfigError, prelude::*};

/// Creates an observable which emits an incrementing counter, starting at 0,
/// every `period`. It never completes on its own.
///
/// A zero period is rejected up front.
///
/// # Example
///
/// ```
/// use rxlite::prelude::*;
/// use std::time::Duration;
///
/// TestScheduler::init();
/// observable::interval(Duration::from_millis(10), TestScheduler)
///   .unwrap()
///   .take(5)
///   .subscribe(|v| println!("{v}"));
/// TestScheduler::advance_by(Duration::from_millis(50));
///
/// // print log:
/// // 0
/// // 1
/// // 2
/// // 3
/// // 4
/// ```
pub fn interval<S: Scheduler>(period: Duration, scheduler: S) -> Result<Observable<usize>, ConfigError> {
  if period.is_zero() {
    return Err(ConfigError::ZeroPeriod { operator: "interval" });
  }
  Ok(Observable::new(move |subscriber| {
    let count = Cell::new(0);
    let handle = scheduler.schedule_repeating(
      period,
      Box::new(move || {
        subscriber.next(count.get());
        count.set(count.get() + 1);
      }),
    );
    Teardown::from(handle)
  }))
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::{error::ConfigError, prelude::*};

  #[rxlite_macro::test]
  fn counts_from_zero_each_period() {
    TestScheduler::init();
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    let subscription = observable::interval(Duration::from_millis(100), TestScheduler)
      .unwrap()
      .subscribe(move |v| s.borrow_mut().push(v));

    TestScheduler::advance_by(Duration::from_millis(350));
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);

    subscription.unsubscribe();
    assert!(TestScheduler::is_empty());
    TestScheduler::advance_by(Duration::from_millis(500));
    assert_eq!(seen.borrow().len(), 3);
  }

  #[rxlite_macro::test]
  fn subscriptions_count_independently() {
    TestScheduler::init();
    let source = observable::interval(Duration::from_millis(10), TestScheduler).unwrap();
    let first = Rc::new(RefCell::new(vec![]));
    let second = Rc::new(RefCell::new(vec![]));

    let f = first.clone();
    source.subscribe(move |v| f.borrow_mut().push(v));
    TestScheduler::advance_by(Duration::from_millis(20));
    let s = second.clone();
    source.subscribe(move |v| s.borrow_mut().push(v));
    TestScheduler::advance_by(Duration::from_millis(20));

    assert_eq!(*first.borrow(), vec![0, 1, 2, 3]);
    assert_eq!(*second.borrow(), vec![0, 1]);
  }

  #[rxlite_macro::test]
  fn zero_period_is_a_config_error() {
    let err = observable::interval(Duration::ZERO, TestScheduler).unwrap_err();
    assert_eq!(err, ConfigError::ZeroPeriod { operator: "interval" });
  }
}
