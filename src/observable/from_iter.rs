use crate::prelude::*;

/// Creates an observable that emits every element of `iter`, then completes.
///
/// The iterable is cloned for each subscription, so every subscriber sees the
/// full sequence. Emission stops early once the subscriber is closed, which
/// makes infinite iterators usable together with `take`.
///
/// Strings are emitted per character through `chars()`.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::from_iter(vec![0, 1, 2]).subscribe(|v| println!("{v}"));
/// observable::from_iter("abc".chars()).subscribe(|c| println!("{c}"));
/// observable::from_iter(0..).take(3).subscribe(|v| println!("{v}"));
/// ```
pub fn from_iter<Iter>(iter: Iter) -> Observable<Iter::Item>
where
  Iter: IntoIterator + Clone + 'static,
  Iter::Item: 'static,
{
  Observable::new(move |subscriber| {
    for v in iter.clone() {
      if subscriber.is_closed() {
        return Teardown::empty();
      }
      subscriber.next(v);
    }
    subscriber.complete();
    Teardown::empty()
  })
}
