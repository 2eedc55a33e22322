/// Creates an observable that synchronously emits each argument in order,
/// then completes.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
///
/// of!(1, 2, 3).subscribe(|v| println!("{v}"));
///
/// // print log:
/// // 1
/// // 2
/// // 3
/// ```
#[macro_export]
macro_rules! of {
  ($($item:expr),* $(,)?) => {
    $crate::observable::from_iter([$($item),*])
  };
}
