use std::cell::Cell;

use crate::{ops::lift, prelude::*};

/// Emits a value, then drops everything that arrives within `duration` of
/// that emission.
///
/// The clock is read from `scheduler`; the first value is always emitted.
pub fn throttle_time<A, E, S>(
  duration: Duration, scheduler: S,
) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: 'static,
  E: 'static,
  S: Scheduler,
{
  move |source| {
    lift(source, move |subscriber, _| {
      let (downstream, scheduler) = (subscriber.clone(), scheduler.clone());
      let last_emit = Cell::new(None::<Duration>);
      subscriber.forward_with(move |v: A| {
        let now = scheduler.now();
        let open = last_emit.get().map_or(true, |last| now.saturating_sub(last) >= duration);
        if open {
          last_emit.set(Some(now));
          downstream.next(v);
        }
      })
    })
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn throttle_time<S: Scheduler>(self, duration: Duration, scheduler: S) -> Observable<A, E> {
    self.pipe(throttle_time(duration, scheduler))
  }
}
