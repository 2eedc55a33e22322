use std::rc::Rc;

use crate::prelude::*;

/// Transforms the error payload, leaving values and completion untouched.
pub fn map_err<A, E, E2, F>(f: F) -> impl FnOnce(Observable<A, E>) -> Observable<A, E2>
where
  A: 'static,
  E: 'static,
  E2: 'static,
  F: Fn(E) -> E2 + 'static,
{
  let f = Rc::new(f);
  move |source| {
    Observable::new(move |subscriber: Subscriber<A, E2>| {
      let (f, next, error, complete) =
        (f.clone(), subscriber.clone(), subscriber.clone(), subscriber);
      Teardown::from(
        source.subscribe(
          ObserverFns::new()
            .on_next(move |v| next.next(v))
            .on_error(move |e| error.error(f(e)))
            .on_complete(move || complete.complete()),
        ),
      )
    })
  }
}

/// Runs the same transform over values and errors alike, for streams whose
/// values and errors share one type.
pub fn map_both<T, U, F>(f: F) -> impl FnOnce(Observable<T, T>) -> Observable<U, U>
where
  T: 'static,
  U: 'static,
  F: Fn(T) -> U + 'static,
{
  let f = Rc::new(f);
  move |source| {
    let on_err = f.clone();
    source.pipe(map(move |v| f(v))).pipe(map_err(move |e| on_err(e)))
  }
}

impl<A: 'static, E: 'static> Observable<A, E> {
  /// See [`map_err`](crate::ops::map_err()).
  pub fn map_err<E2: 'static>(self, f: impl Fn(E) -> E2 + 'static) -> Observable<A, E2> {
    self.pipe(map_err(f))
  }
}

impl<T: 'static> Observable<T, T> {
  /// See [`map_both`](crate::ops::map_both()).
  pub fn map_both<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Observable<U, U> {
    self.pipe(map_both(f))
  }
}
