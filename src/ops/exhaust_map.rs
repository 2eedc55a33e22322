use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use crate::prelude::*;

/// Maps a value to an inner observable and mirrors it, ignoring every source
/// value that arrives while that inner observable is still running.
///
/// The output completes once the source has completed and no inner
/// observable is active.
pub fn exhaust_map<A, B, E, F>(project: F) -> impl FnOnce(Observable<A, E>) -> Observable<B, E>
where
  A: 'static,
  B: 'static,
  E: 'static,
  F: Fn(A) -> Observable<B, E> + 'static,
{
  let project = Rc::new(project);
  move |source| {
    Observable::new(move |subscriber: Subscriber<B, E>| {
      let state = Rc::new(ExhaustState::default());
      let (on_next, on_complete) = (state.clone(), state.clone());
      let (downstream, complete) = (subscriber.clone(), subscriber.clone());
      let project = project.clone();

      let outer = source.subscribe(
        subscriber
          .forward_with(move |v: A| {
            if on_next.busy.get() {
              return;
            }
            on_next.busy.set(true);
            let (done, next, finish) = (on_next.clone(), downstream.clone(), downstream.clone());
            let inner = project(v).subscribe(
              downstream.forward_with(move |v: B| next.next(v)).on_complete(move || {
                done.busy.set(false);
                done.inner.borrow_mut().take();
                if done.outer_done.get() {
                  finish.complete();
                }
              }),
            );
            if on_next.busy.get() {
              *on_next.inner.borrow_mut() = Some(inner);
            }
          })
          .on_complete(move || {
            on_complete.outer_done.set(true);
            if !on_complete.busy.get() {
              complete.complete();
            }
          }),
      );

      Teardown::new(move || {
        outer.unsubscribe();
        let inner = state.inner.borrow_mut().take();
        if let Some(inner) = inner {
          inner.unsubscribe();
        }
      })
    })
  }
}

#[derive(Default)]
struct ExhaustState {
  busy: Cell<bool>,
  inner: RefCell<Option<Subscription>>,
  outer_done: Cell<bool>,
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn exhaust_map<B, F>(self, project: F) -> Observable<B, E>
  where
    B: 'static,
    F: Fn(A) -> Observable<B, E> + 'static,
  {
    self.pipe(exhaust_map(project))
  }
}
