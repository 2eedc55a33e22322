use std::rc::Rc;

use crate::{
  event::{EventSource, Listener},
  prelude::*,
};

/// Creates an observable that emits every `name` occurrence of `source`.
///
/// Each subscription registers its own listener; the teardown deregisters
/// it. The stream never completes on its own.
///
/// ```rust
/// use rxlite::prelude::*;
/// use std::rc::Rc;
///
/// let button = Rc::new(EventTarget::<&str>::new());
/// let subscription = observable::from_event(button.clone(), "click").subscribe(|ev| println!("{ev}"));
/// button.dispatch("click", "pressed");
/// subscription.unsubscribe();
/// assert_eq!(button.listener_count("click"), 0);
/// ```
pub fn from_event<Ev, S>(source: Rc<S>, name: impl Into<String>) -> Observable<Ev>
where
  Ev: 'static,
  S: EventSource<Ev> + ?Sized + 'static,
{
  let name: String = name.into();
  Observable::new(move |subscriber| {
    let listener: Listener<Ev> = Rc::new(move |ev| subscriber.next(ev));
    source.add_listener(&name, listener.clone());

    let (source, name) = (source.clone(), name.clone());
    Teardown::new(move || source.remove_listener(&name, &listener))
  })
}
