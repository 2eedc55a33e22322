use crate::prelude::*;

/// Mirrors the source, then emits `value` right before completing.
///
/// Nothing is appended when the source errors.
pub fn end_with<A, E>(value: A) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: Clone + 'static,
  E: 'static,
{
  move |source| {
    Observable::new(move |subscriber: Subscriber<A, E>| {
      let (next, error, complete) = (subscriber.clone(), subscriber.clone(), subscriber);
      let value = value.clone();
      Teardown::from(
        source.subscribe(
          ObserverFns::new()
            .on_next(move |v| next.next(v))
            .on_error(move |e| error.error(e))
            .on_complete(move || {
              complete.next(value);
              complete.complete();
            }),
        ),
      )
    })
  }
}

impl<A: Clone + 'static, E: 'static> Observable<A, E> {
  pub fn end_with(self, value: A) -> Observable<A, E> { self.pipe(end_with(value)) }
}
