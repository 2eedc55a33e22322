//! Reduce operator implementation
//!
//! Applies an accumulator function over the source and emits the final
//! accumulated value once, when the source completes. The accumulation rule
//! is shared with `scan`.

use std::{cell::RefCell, rc::Rc};

use crate::prelude::*;

/// The accumulation step, seeded or unseeded.
pub(crate) trait ReduceStrategy<Acc, Item> {
  /// `acc` is `None` only before the first value of an unseeded reduction.
  fn apply(&self, acc: Option<Acc>, value: Item) -> Acc;
}

/// Unseeded: the first value becomes the accumulator without passing
/// through the function.
pub(crate) struct ReduceFn<F>(pub(crate) F);

impl<F, Item> ReduceStrategy<Item, Item> for ReduceFn<F>
where
  F: Fn(Item, Item) -> Item,
{
  fn apply(&self, acc: Option<Item>, value: Item) -> Item {
    match acc {
      Some(acc) => (self.0)(acc, value),
      None => value,
    }
  }
}

/// Seeded: the accumulator starts as a clone of the seed.
pub(crate) struct ReduceInitialFn<F, Acc> {
  pub(crate) seed: Acc,
  pub(crate) f: F,
}

impl<F, Acc, Item> ReduceStrategy<Acc, Item> for ReduceInitialFn<F, Acc>
where
  F: Fn(Acc, Item) -> Acc,
  Acc: Clone,
{
  fn apply(&self, acc: Option<Acc>, value: Item) -> Acc {
    (self.f)(acc.unwrap_or_else(|| self.seed.clone()), value)
  }
}

/// Subscribes `source`, folding values through `strategy`. With `emit_each`
/// the running accumulator is emitted per value (scan); otherwise the final
/// one is emitted on completion (reduce), where `on_empty` stands in when no
/// value arrived.
pub(crate) fn accumulate<A, Acc, E, S>(
  source: Observable<A, E>, strategy: S, emit_each: bool, on_empty: Option<Acc>,
) -> Observable<Acc, E>
where
  A: 'static,
  Acc: Clone + 'static,
  E: 'static,
  S: ReduceStrategy<Acc, A> + 'static,
{
  let strategy = Rc::new(strategy);
  Observable::new(move |subscriber: Subscriber<Acc, E>| {
    let acc: Rc<RefCell<Option<Acc>>> = Rc::new(RefCell::new(None));
    let (strategy, step_acc, next) = (strategy.clone(), acc.clone(), subscriber.clone());
    let (error, complete, on_empty) = (subscriber.clone(), subscriber, on_empty.clone());
    Teardown::from(
      source.subscribe(
        ObserverFns::new()
          .on_next(move |v: A| {
            let prev = step_acc.borrow_mut().take();
            let updated = strategy.apply(prev, v);
            *step_acc.borrow_mut() = Some(updated.clone());
            if emit_each {
              next.next(updated);
            }
          })
          .on_error(move |e| error.error(e))
          .on_complete(move || {
            if !emit_each {
              let last = acc.borrow_mut().take().or(on_empty);
              if let Some(last) = last {
                complete.next(last);
              }
            }
            complete.complete();
          }),
      ),
    )
  })
}

/// Folds every value into an accumulator and emits the result on completion.
///
/// The first value seeds the accumulator. An empty source emits nothing and
/// just completes.
pub fn reduce<A, E, F>(f: F) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: Clone + 'static,
  E: 'static,
  F: Fn(A, A) -> A + 'static,
{
  move |source| accumulate(source, ReduceFn(f), false, None)
}

/// Like [`reduce`] but starting from `seed`, which is emitted unchanged when
/// the source is empty.
pub fn reduce_initial<A, Acc, E, F>(
  seed: Acc, f: F,
) -> impl FnOnce(Observable<A, E>) -> Observable<Acc, E>
where
  A: 'static,
  Acc: Clone + 'static,
  E: 'static,
  F: Fn(Acc, A) -> Acc + 'static,
{
  move |source| {
    let on_empty = Some(seed.clone());
    accumulate(source, ReduceInitialFn { seed, f }, false, on_empty)
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn reduce(self, f: impl Fn(A, A) -> A + 'static) -> Observable<A, E>
  where
    A: Clone,
  {
    self.pipe(reduce(f))
  }

  pub fn reduce_initial<Acc: Clone + 'static>(
    self, seed: Acc, f: impl Fn(Acc, A) -> Acc + 'static,
  ) -> Observable<Acc, E> {
    self.pipe(reduce_initial(seed, f))
  }
}
