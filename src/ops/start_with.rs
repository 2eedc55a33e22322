use crate::prelude::*;

/// Emits `value` synchronously before subscribing upstream, then mirrors the
/// source.
pub fn start_with<A, E>(value: A) -> impl FnOnce(Observable<A, E>) -> Observable<A, E>
where
  A: Clone + 'static,
  E: 'static,
{
  move |source| {
    Observable::new(move |subscriber| {
      subscriber.next(value.clone());
      if subscriber.is_closed() {
        return Teardown::empty();
      }
      let downstream = subscriber.clone();
      Teardown::from(source.subscribe(subscriber.forward_with(move |v: A| downstream.next(v))))
    })
  }
}

impl<A: Clone + 'static, E: 'static> Observable<A, E> {
  pub fn start_with(self, value: A) -> Observable<A, E> { self.pipe(start_with(value)) }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn simple_integer() {
    let ret = Rc::new(RefCell::new(String::new()));
    let r = ret.clone();
    from_iter(1..5).start_with(0).subscribe(move |v: i32| r.borrow_mut().push_str(&v.to_string()));
    assert_eq!(*ret.borrow(), "01234");
  }

  #[rxlite_macro::test]
  fn start_value_arrives_before_upstream_subscribes() {
    let log = Rc::new(RefCell::new(vec![]));
    let (l, s) = (log.clone(), log.clone());
    let source = Observable::<&str>::new(move |subscriber| {
      l.borrow_mut().push("subscribed");
      subscriber.next("upstream");
      Teardown::empty()
    });
    source.start_with("first").subscribe(move |v| s.borrow_mut().push(v));
    assert_eq!(*log.borrow(), vec!["first", "subscribed", "upstream"]);
  }

  #[rxlite_macro::test]
  fn take_one_skips_upstream() {
    let subscribed = Rc::new(RefCell::new(false));
    let s = subscribed.clone();
    let source = Observable::<i32>::new(move |_| {
      *s.borrow_mut() = true;
      Teardown::empty()
    });
    source.start_with(1).take(1).subscribe(|_| {});
    assert!(!*subscribed.borrow());
  }
}
