use std::{cell::RefCell, rc::Rc};

use crate::{prelude::*, scheduler::cancel_slot};

/// Emits a value only after `duration` has passed without another value.
///
/// Every value cancels the pending emission and schedules a new one, so only
/// the last value of each quiet-`duration` window gets through. Completion
/// of the source cancels the pending emission and completes at once, so a
/// value that never saw a full quiet window is dropped.
///
/// ```
/// use rxlite::prelude::*;
///
/// TestScheduler::init();
/// observable::interval(Duration::from_millis(20), TestScheduler)
///   .unwrap()
///   .take_until(observable::timer(Duration::from_millis(300), None, TestScheduler).unwrap())
///   .debounce_time(Duration::from_millis(30), TestScheduler)
///   .subscribe(|_| unreachable!());
/// TestScheduler::flush();
/// ```
pub fn debounce_time<A, E, S>(
  duration: Duration, scheduler: S,
) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: 'static,
  E: 'static,
  S: Scheduler,
{
  move |source| {
    Observable::new(move |subscriber: Subscriber<A, E>| {
      let state = Rc::new(DebounceState::default());
      let (on_next, on_complete) = (state.clone(), state.clone());
      let (next, error, complete) = (subscriber.clone(), subscriber.clone(), subscriber);
      let scheduler = scheduler.clone();

      let upstream = source.subscribe(
        ObserverFns::new()
          .on_next(move |v| {
            cancel_slot(&on_next.timer);
            *on_next.last.borrow_mut() = Some(v);
            let (fire, next) = (on_next.clone(), next.clone());
            let handle = scheduler.schedule(
              duration,
              Box::new(move || {
                fire.timer.borrow_mut().take();
                let value = fire.last.borrow_mut().take();
                if let Some(v) = value {
                  next.next(v);
                }
              }),
            );
            *on_next.timer.borrow_mut() = Some(handle);
          })
          .on_error(move |e| error.error(e))
          .on_complete(move || {
            cancel_slot(&on_complete.timer);
            on_complete.last.borrow_mut().take();
            complete.complete();
          }),
      );

      Teardown::new(move || {
        cancel_slot(&state.timer);
        upstream.unsubscribe();
      })
    })
  }
}

struct DebounceState<A> {
  timer: RefCell<Option<TaskHandle>>,
  last: RefCell<Option<A>>,
}

impl<A> Default for DebounceState<A> {
  fn default() -> Self { Self { timer: RefCell::new(None), last: RefCell::new(None) } }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn debounce_time<S: Scheduler>(self, duration: Duration, scheduler: S) -> Observable<A, E> {
    self.pipe(debounce_time(duration, scheduler))
  }
}
