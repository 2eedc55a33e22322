//! Operators: unary transforms from one [`Observable`] to another.
//!
//! Every operator is available two ways:
//!
//! - as a free function returning an [`Operator`], for composition with
//!   [`Observable::pipe`], [`Observable::pipe_all`] or the [`pipe!`] macro;
//! - as a chaining method on [`Observable`] (`source.map(f)`).
//!
//! Applying an operator never touches its input; it returns a new observable
//! whose producer subscribes upstream once per downstream subscription.
//!
//! [`pipe!`]: crate::pipe

use crate::{
  observable::{Observable, Subscriber, Teardown},
  observer::IntoObserver,
  subscription::Subscription,
};

pub mod audit_time;
pub mod combine_latest;
pub mod debounce;
pub mod end_with;
pub mod exhaust_map;
pub mod filter;
pub mod finalize;
pub mod find;
pub mod map;
pub mod map_err;
pub mod map_to;
pub mod merge;
pub mod pluck;
pub mod reduce;
pub mod sample;
pub mod scan;
pub mod skip;
pub mod start_with;
pub mod switch_map;
pub mod take;
pub mod take_until;
pub mod take_while;
pub mod throttle_time;
pub mod to_array;

pub use audit_time::audit_time;
pub use combine_latest::combine_latest;
pub use debounce::debounce_time;
pub use end_with::end_with;
pub use exhaust_map::exhaust_map;
pub use filter::filter;
pub use finalize::finalize;
pub use find::find;
pub use map::map;
pub use map_err::{map_both, map_err};
pub use map_to::map_to;
pub use merge::merge;
pub use pluck::pluck;
pub use reduce::{reduce, reduce_initial};
pub use sample::sample_time;
pub use scan::{scan, scan_initial};
pub use skip::skip;
pub use start_with::start_with;
pub use switch_map::switch_map;
pub use take::take;
pub use take_until::take_until;
pub use take_while::take_while;
pub use throttle_time::throttle_time;
pub use to_array::to_array;

/// A unary transform applied by [`Observable::pipe`].
///
/// Implemented for every `FnOnce(In) -> Out`, which is what the operator
/// functions in this module return.
pub trait Operator<In> {
  type Output;

  fn apply(self, input: In) -> Self::Output;
}

impl<In, Out, F> Operator<In> for F
where
  F: FnOnce(In) -> Out,
{
  type Output = Out;

  #[inline]
  fn apply(self, input: In) -> Out { self(input) }
}

/// Left-folds operators over a source observable.
///
/// `pipe!(src)` is `src`; `pipe!(src, a, b)` is `src.pipe(a).pipe(b)`.
///
/// ```rust
/// use rxlite::prelude::*;
///
/// pipe!(of!(1, 2, 3, 4), map(|v: i32| v + 10), filter(|v: &i32| v % 2 == 0))
///   .subscribe(|v| println!("{v}"));
///
/// // print log:
/// // 12
/// // 14
/// ```
#[macro_export]
macro_rules! pipe {
  ($source:expr $(, $op:expr)* $(,)?) => {{
    let piped = $source;
    $(let piped = piped.pipe($op);)*
    piped
  }};
}

/// Builds an operator's output observable.
///
/// For each downstream subscription, `setup` receives the downstream
/// subscriber and the upstream subscription handle (usable for a forced
/// release) and returns the observer to subscribe upstream with. The
/// output's teardown unsubscribes upstream.
pub(crate) fn lift<A, B, E, O>(
  source: Observable<A, E>, setup: impl Fn(Subscriber<B, E>, &Subscription) -> O + 'static,
) -> Observable<B, E>
where
  A: 'static,
  B: 'static,
  E: 'static,
  O: IntoObserver<A, E>,
{
  Observable::new(move |subscriber| {
    Teardown::from(source.subscribe_with(|upstream| setup(subscriber, upstream)))
  })
}
