use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use crate::prelude::*;

/// Maps each value to an inner observable and mirrors only the most recent
/// one.
///
/// A new value releases the current inner subscription before `project`'s
/// next observable is subscribed. The output completes once the source has
/// completed and the last inner observable has completed too.
///
/// ```
/// use rxlite::prelude::*;
///
/// of!(1, 2, 3)
///   .switch_map(|v| of!(v * 10, v * 100))
///   .subscribe(|v| println!("{v}"));
/// ```
pub fn switch_map<A, B, E, F>(project: F) -> impl FnOnce(Observable<A, E>) -> Observable<B, E>
where
  A: 'static,
  B: 'static,
  E: 'static,
  F: Fn(A) -> Observable<B, E> + 'static,
{
  let project = Rc::new(project);
  move |source| {
    Observable::new(move |subscriber: Subscriber<B, E>| {
      let state = Rc::new(SwitchState::default());
      let (on_next, on_complete) = (state.clone(), state.clone());
      let (downstream, complete) = (subscriber.clone(), subscriber.clone());
      let project = project.clone();

      let outer = source.subscribe(
        subscriber
          .forward_with(move |v: A| {
            let generation = on_next.generation.get() + 1;
            on_next.generation.set(generation);
            let previous = on_next.inner.borrow_mut().take();
            if let Some(previous) = previous {
              previous.release();
            }

            on_next.inner_active.set(true);
            let (current, done) = (on_next.clone(), on_next.clone());
            let (next, finish) = (downstream.clone(), downstream.clone());
            let inner = project(v).subscribe(
              downstream
                .forward_with(move |v: B| {
                  if current.generation.get() == generation {
                    next.next(v);
                  }
                })
                .on_complete(move || {
                  if done.generation.get() != generation {
                    return;
                  }
                  done.inner_active.set(false);
                  if done.outer_done.get() {
                    finish.complete();
                  }
                }),
            );
            if on_next.generation.get() == generation && on_next.inner_active.get() {
              *on_next.inner.borrow_mut() = Some(inner);
            }
          })
          .on_complete(move || {
            on_complete.outer_done.set(true);
            if !on_complete.inner_active.get() {
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
struct SwitchState {
  generation: Cell<u64>,
  inner: RefCell<Option<Subscription>>,
  inner_active: Cell<bool>,
  outer_done: Cell<bool>,
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn switch_map<B, F>(self, project: F) -> Observable<B, E>
  where
    B: 'static,
    F: Fn(A) -> Observable<B, E> + 'static,
  {
    self.pipe(switch_map(project))
  }
}
