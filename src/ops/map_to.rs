use crate::{ops::lift, prelude::*};

/// Emits a clone of `value` for every upstream value.
pub fn map_to<A, B, E>(value: B) -> impl FnOnce(Observable<A, E>) -> Observable<B, E>
where
  A: 'static,
  B: Clone + 'static,
  E: 'static,
{
  move |source| {
    lift(source, move |subscriber, _| {
      let (value, downstream) = (value.clone(), subscriber.clone());
      subscriber.forward_with(move |_: A| downstream.next(value.clone()))
    })
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn map_to<B: Clone + 'static>(self, value: B) -> Observable<B, E> { self.pipe(map_to(value)) }
}
