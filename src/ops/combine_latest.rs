use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use smallvec::SmallVec;

use crate::prelude::*;

/// Emits a snapshot of the latest value of every source whenever any of
/// them emits, once each source has emitted at least once.
///
/// Snapshots are ordered like `sources`. The output completes when every
/// source has completed, or immediately when a source completes without
/// having emitted, since no snapshot can follow. An empty list completes
/// right away.
pub fn combine_latest<A, E>(sources: Vec<Observable<A, E>>) -> Observable<Vec<A>, E>
where
  A: Clone + 'static,
  E: 'static,
{
  Observable::new(move |subscriber: Subscriber<Vec<A>, E>| {
    let total = sources.len();
    if total == 0 {
      subscriber.complete();
      return Teardown::empty();
    }
    let state = Rc::new(CombineState {
      latest: RefCell::new((0..total).map(|_| None).collect()),
      completed: Cell::new(0),
    });
    let mut inputs: SmallVec<[Subscription; 2]> = SmallVec::new();
    for (index, source) in sources.iter().enumerate() {
      if subscriber.is_closed() {
        break;
      }
      let (on_next, on_complete) = (state.clone(), state.clone());
      let (next, done) = (subscriber.clone(), subscriber.clone());
      let input = source.subscribe(
        subscriber
          .forward_with(move |v: A| {
            let snapshot = on_next.record(index, v);
            if let Some(snapshot) = snapshot {
              next.next(snapshot);
            }
          })
          .on_complete(move || {
            on_complete.completed.set(on_complete.completed.get() + 1);
            let never_emitted = on_complete.latest.borrow()[index].is_none();
            if never_emitted || on_complete.completed.get() == total {
              done.complete();
            }
          }),
      );
      inputs.push(input);
    }
    Teardown::new(move || inputs.iter().for_each(Subscription::unsubscribe))
  })
}

struct CombineState<A> {
  latest: RefCell<Vec<Option<A>>>,
  completed: Cell<usize>,
}

impl<A: Clone> CombineState<A> {
  /// Stores `value` for source `index` and returns the full snapshot once
  /// every source has a value.
  fn record(&self, index: usize, value: A) -> Option<Vec<A>> {
    let mut latest = self.latest.borrow_mut();
    latest[index] = Some(value);
    latest.iter().cloned().collect()
  }
}

impl<A: Clone + 'static, E: 'static> Observable<A, E> {
  /// Combines `self` with one more source; see [`combine_latest`].
  pub fn combine_latest(self, other: Observable<A, E>) -> Observable<Vec<A>, E> {
    combine_latest(vec![self, other])
  }
}
