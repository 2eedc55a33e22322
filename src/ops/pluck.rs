use std::rc::Rc;

use serde_json::Value;

use crate::{ops::lift, prelude::*};

/// Walks `keys` into each emitted JSON object and emits what it finds.
///
/// A key missing at some level is skipped and the walk continues from the
/// current value, so a value without any of the keys is emitted unchanged.
///
/// ```
/// use rxlite::prelude::*;
/// use serde_json::json;
///
/// of!(json!({ "name": "emre", "address": { "street": "544 sok" } }))
///   .pluck(["address", "street"])
///   .subscribe(|v| assert_eq!(v, json!("544 sok")));
/// ```
pub fn pluck<E, K>(keys: K) -> impl FnOnce(Observable<Value, E>) -> Observable<Value, E>
where
  E: 'static,
  K: IntoIterator,
  K::Item: Into<String>,
{
  let keys: Rc<[String]> = keys.into_iter().map(Into::into).collect();
  move |source| {
    lift(source, move |subscriber, _| {
      let (keys, downstream) = (keys.clone(), subscriber.clone());
      subscriber.forward_with(move |v: Value| downstream.next(walk(v, &keys)))
    })
  }
}

fn walk(mut value: Value, keys: &[String]) -> Value {
  for key in keys {
    if let Some(inner) = value.get_mut(key.as_str()) {
      value = inner.take();
    }
  }
  value
}

impl<E: 'static> Observable<Value, E> {
  pub fn pluck<K>(self, keys: K) -> Observable<Value, E>
  where
    K: IntoIterator,
    K::Item: Into<String>,
  {
    self.pipe(pluck(keys))
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, rc::Rc};

  use serde_json::json;

  use crate::prelude::*;

  #[rxlite_macro::test]
  fn resolves_nested_and_missing_keys() {
    let seen = Rc::new(RefCell::new(vec![]));
    let s = seen.clone();
    of!(json!({ "a": { "b": 1 } }), json!({ "a": 2 }), json!({ "c": 3 }), json!("flat"))
      .pluck(["a", "b"])
      .subscribe(move |v| s.borrow_mut().push(v));
    assert_eq!(*seen.borrow(), vec![json!(1), json!(2), json!({ "c": 3 }), json!("flat")]);
  }
}
