use std::{cell::RefCell, rc::Rc};

use crate::{error::ConfigError, prelude::*, scheduler::cancel_slot};

/// Every `period`, emits the most recent value if a new one arrived since
/// the previous tick.
///
/// Completion of the source stops the ticks and completes the output; a
/// value that arrived after the last tick is dropped. A zero period is
/// rejected up front.
pub fn sample_time<A, E, S>(
  period: Duration, scheduler: S,
) -> Result<impl FnOnce(Observable<A, E>) -> Observable<A, E>, ConfigError>
where
  A: 'static,
  E: 'static,
  S: Scheduler,
{
  if period.is_zero() {
    return Err(ConfigError::ZeroPeriod { operator: "sample_time" });
  }
  Ok(move |source: Observable<A, E>| {
    Observable::new(move |subscriber: Subscriber<A, E>| {
      let latest = Rc::new(RefCell::new(None::<A>));
      let (sampled, ticker) = (latest.clone(), subscriber.clone());
      let timer = Rc::new(RefCell::new(Some(scheduler.schedule_repeating(
        period,
        Box::new(move || {
          let value = sampled.borrow_mut().take();
          if let Some(v) = value {
            ticker.next(v);
          }
        }),
      ))));

      let (stop, complete) = (timer.clone(), subscriber.clone());
      let upstream = source.subscribe(
        subscriber
          .forward_with(move |v: A| *latest.borrow_mut() = Some(v))
          .on_complete(move || {
            cancel_slot(&stop);
            complete.complete();
          }),
      );

      Teardown::new(move || {
        cancel_slot(&timer);
        upstream.unsubscribe();
      })
    })
  })
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn sample_time<S: Scheduler>(
    self, period: Duration, scheduler: S,
  ) -> Result<Observable<A, E>, ConfigError> {
    Ok(self.pipe(sample_time(period, scheduler)?))
  }
}
