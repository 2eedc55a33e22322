use crate::prelude::*;

/// Creates an observable that emits no items, just terminates with an error.
///
/// # Arguments
///
/// * `e` - An error to emit and terminate with
pub fn throw_err<Item, Err>(e: Err) -> Observable<Item, Err>
where
  Item: 'static,
  Err: Clone + 'static,
{
  Observable::new(move |subscriber| {
    subscriber.error(e.clone());
    Teardown::empty()
  })
}

/// Creates an observable that produces no values.
///
/// Completes immediately. Never emits an error.
///
/// # Examples
/// ```
/// use rxlite::prelude::*;
///
/// observable::empty::<i32>().subscribe(|v| println!("{v}"));
///
/// // Result: nothing printed
/// ```
pub fn empty<Item: 'static>() -> Observable<Item> {
  Observable::new(|subscriber| {
    subscriber.complete();
    Teardown::empty()
  })
}

/// Creates an observable that never emits anything, neither values nor
/// errors, nor completion.
pub fn never<Item: 'static>() -> Observable<Item> { Observable::new(|_| Teardown::empty()) }

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  fn record<Err: std::fmt::Debug + 'static>(
    source: Observable<i32, Err>,
  ) -> (Rc<RefCell<Vec<String>>>, Subscription) {
    let log = Rc::new(RefCell::new(vec![]));
    let (n, e, c) = (log.clone(), log.clone(), log.clone());
    let subscription = source.subscribe_all(
      move |v| n.borrow_mut().push(format!("next {v}")),
      move |err| e.borrow_mut().push(format!("error {err:?}")),
      move || c.borrow_mut().push("complete".to_string()),
    );
    (log, subscription)
  }

  #[rxlite_macro::test]
  fn throw_err_errors_without_values() {
    let (log, subscription) = record(observable::throw_err::<i32, _>("bad"));
    assert_eq!(*log.borrow(), vec!["error \"bad\""]);
    assert!(subscription.is_closed());
  }

  #[rxlite_macro::test]
  fn empty_completes_immediately() {
    let (log, _) = record(observable::empty());
    assert_eq!(*log.borrow(), vec!["complete"]);
  }

  #[rxlite_macro::test]
  fn never_stays_open() {
    let (log, subscription) = record(observable::never());
    assert!(log.borrow().is_empty());
    assert!(!subscription.is_closed());
    subscription.unsubscribe();
    assert!(subscription.is_closed());
  }
}
