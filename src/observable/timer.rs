use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use crate::{error::ConfigError, prelude::*, scheduler::cancel_slot};

/// Returns an observable which emits `0` once after `delay`.
///
/// Without a `period` it completes right after that emission. With one, it
/// keeps emitting `1, 2, ...` every `period` and never completes on its own.
/// A zero period is rejected up front.
pub fn timer<S: Scheduler>(
  delay: Duration, period: Option<Duration>, scheduler: S,
) -> Result<Observable<usize>, ConfigError> {
  if period.is_some_and(|p| p.is_zero()) {
    return Err(ConfigError::ZeroPeriod { operator: "timer" });
  }
  Ok(Observable::new(move |subscriber| {
    let current = Rc::new(RefCell::new(None::<TaskHandle>));
    let repeat = current.clone();
    let sched = scheduler.clone();
    let first = scheduler.schedule(
      delay,
      Box::new(move || {
        subscriber.next(0);
        let Some(period) = period else {
          subscriber.complete();
          return;
        };
        if subscriber.is_closed() {
          return;
        }
        let count = Cell::new(1);
        let handle = sched.schedule_repeating(
          period,
          Box::new(move || {
            subscriber.next(count.get());
            count.set(count.get() + 1);
          }),
        );
        *repeat.borrow_mut() = Some(handle);
      }),
    );
    *current.borrow_mut() = Some(first);
    Teardown::new(move || cancel_slot(&current))
  }))
}
