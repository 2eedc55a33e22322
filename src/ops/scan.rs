use crate::{
  ops::reduce::{accumulate, ReduceFn, ReduceInitialFn},
  prelude::*,
};

/// Emits the running accumulator after every value.
///
/// The first value seeds the accumulator and is emitted as is.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
///
/// of!(1, 2, 3).scan(|acc, v| acc + v).subscribe(|v| println!("{v}"));
///
/// // print log:
/// // 1
/// // 3
/// // 6
/// ```
pub fn scan<A, E, F>(f: F) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: Clone + 'static,
  E: 'static,
  F: Fn(A, A) -> A + 'static,
{
  move |source| accumulate(source, ReduceFn(f), true, None)
}

/// Like [`scan`] but starting from `seed`.
pub fn scan_initial<A, Acc, E, F>(
  seed: Acc, f: F,
) -> impl FnOnce(Observable<A, E>) -> Observable<Acc, E>
where
  A: 'static,
  Acc: Clone + 'static,
  E: 'static,
  F: Fn(Acc, A) -> Acc + 'static,
{
  move |source| accumulate(source, ReduceInitialFn { seed, f }, true, None)
}

impl<A: 'static, E: 'static> Observable<A, E> {
  pub fn scan(self, f: impl Fn(A, A) -> A + 'static) -> Observable<A, E>
  where
    A: Clone,
  {
    self.pipe(scan(f))
  }

  pub fn scan_initial<Acc: Clone + 'static>(
    self, seed: Acc, f: impl Fn(Acc, A) -> Acc + 'static,
  ) -> Observable<Acc, E> {
    self.pipe(scan_initial(seed, f))
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn scan_initial() {
    let emitted = Rc::new(RefCell::new(vec![]));
    let e = emitted.clone();
    from_iter(vec![1, 1, 1, 1, 1])
      .scan_initial(100, |acc, v| acc + v)
      .subscribe(move |v| e.borrow_mut().push(v));
    assert_eq!(*emitted.borrow(), vec![101, 102, 103, 104, 105]);
  }

  #[rxlite_macro::test]
  fn scan_initial_on_empty_observable() {
    let emitted = Rc::new(RefCell::new(Vec::<i32>::new()));
    let e = emitted.clone();
    empty().scan_initial(100, |acc, v: i32| acc + v).subscribe(move |v| e.borrow_mut().push(v));
    assert!(emitted.borrow().is_empty());
  }

  #[rxlite_macro::test]
  fn scan_sums_running_total() {
    let emitted = Rc::new(RefCell::new(vec![]));
    let e = emitted.clone();
    of!(1, 2, 3).scan(|acc, v| acc + v).subscribe(move |v| e.borrow_mut().push(v));
    assert_eq!(*emitted.borrow(), vec![1, 3, 6]);
  }

  #[rxlite_macro::test]
  fn scan_can_change_type() {
    let emitted = Rc::new(RefCell::new(vec![]));
    let e = emitted.clone();
    of!('a', 'b')
      .scan_initial(String::new(), |mut acc, c| {
        acc.push(c);
        acc
      })
      .subscribe(move |v| e.borrow_mut().push(v));
    assert_eq!(*emitted.borrow(), vec!["a", "ab"]);
  }
}
