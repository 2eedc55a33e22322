use futures::future::{Future, FutureExt};

use crate::prelude::*;

/// Converts a `Future` to an observable sequence that emits its output once,
/// then completes.
///
/// Even when the output is a `Result::Err` it is emitted as a normal value,
/// not routed to the error channel; use [`from_result_future`] for that.
///
/// Unlike the other creation functions, the work does not restart per
/// subscription: a `Future` can only be polled to completion once, so it is
/// wrapped in [`FutureExt::shared`] and every subscriber, including late
/// ones, receives a clone of the same output. Unsubscribing before it
/// resolves drops only that subscriber's wait.
///
/// ```rust
/// use rxlite::prelude::*;
/// use std::{cell::Cell, rc::Rc};
///
/// TestScheduler::init();
/// let res = Rc::new(Cell::new(0));
/// let r = res.clone();
/// observable::from_future(futures::future::ready(1), TestScheduler).subscribe(move |v| r.set(v));
///
/// TestScheduler::flush();
/// assert_eq!(res.get(), 1);
/// ```
pub fn from_future<F, S>(future: F, scheduler: S) -> Observable<F::Output>
where
  F: Future + 'static,
  F::Output: Clone + 'static,
  S: Scheduler,
{
  let shared = future.shared();
  Observable::new(move |subscriber| {
    let output = shared.clone();
    let handle = scheduler.spawn(Box::pin(async move {
      let value = output.await;
      subscriber.next(value);
      subscriber.complete();
    }));
    Teardown::from(handle)
  })
}

/// Like [`from_future`], but an `Err` output is delivered through the error
/// channel instead of as a value. The future is shared the same way.
pub fn from_result_future<F, Item, Err, S>(future: F, scheduler: S) -> Observable<Item, Err>
where
  F: Future<Output = Result<Item, Err>> + 'static,
  Item: Clone + 'static,
  Err: Clone + 'static,
  S: Scheduler,
{
  let shared = future.shared();
  Observable::new(move |subscriber| {
    let output = shared.clone();
    let handle = scheduler.spawn(Box::pin(async move {
      match output.await {
        Ok(value) => {
          subscriber.next(value);
          subscriber.complete();
        }
        Err(err) => subscriber.error(err),
      }
    }));
    Teardown::from(handle)
  })
}
