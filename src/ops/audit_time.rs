use std::{cell::RefCell, rc::Rc};

use crate::{prelude::*, scheduler::cancel_slot};

/// Opens a `duration` window on the first value of a burst and emits the
/// most recent value when the window closes.
///
/// Values inside an open window only replace the tracked value. Completion
/// of the source closes the window early and drops the tracked value.
pub fn audit_time<A, E, S>(
  duration: Duration, scheduler: S,
) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: 'static,
  E: 'static,
  S: Scheduler,
{
  move |source| {
    Observable::new(move |subscriber: Subscriber<A, E>| {
      let state = Rc::new(AuditState::default());
      let (on_next, on_complete) = (state.clone(), state.clone());
      let (next, error, complete) = (subscriber.clone(), subscriber.clone(), subscriber);
      let scheduler = scheduler.clone();

      let upstream = source.subscribe(
        ObserverFns::new()
          .on_next(move |v| {
            *on_next.latest.borrow_mut() = Some(v);
            if on_next.window.borrow().is_some() {
              return;
            }
            let (fire, next) = (on_next.clone(), next.clone());
            let handle = scheduler.schedule(
              duration,
              Box::new(move || {
                fire.window.borrow_mut().take();
                let value = fire.latest.borrow_mut().take();
                if let Some(v) = value {
                  next.next(v);
                }
              }),
            );
            *on_next.window.borrow_mut() = Some(handle);
          })
          .on_error(move |e| error.error(e))
          .on_complete(move || {
            cancel_slot(&on_complete.window);
            on_complete.latest.borrow_mut().take();
            complete.complete();
          }),
      );

      Teardown::new(move || {
        cancel_slot(&state.window);
        upstream.unsubscribe();
      })
    })
  }
}

struct AuditState<A> {
  window: RefCell<Option<TaskHandle>>,
  latest: RefCell<Option<A>>,
}

impl<A> Default for AuditState<A> {
  fn default() -> Self { Self { window: RefCell::new(None), latest: RefCell::new(None) } }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn audit_time<S: Scheduler>(self, duration: Duration, scheduler: S) -> Observable<A, E> {
    self.pipe(audit_time(duration, scheduler))
  }
}
