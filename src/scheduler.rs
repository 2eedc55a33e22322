//! Timer service used by the time-based creation functions and operators.
//!
//! The core never talks to a clock directly. Everything that needs to wait
//! goes through a [`Scheduler`]: schedule a callback after a delay, schedule a
//! repeating callback, drive a future, or read a monotonic clock. Every
//! scheduled unit of work is represented by a [`TaskHandle`] that can cancel
//! it before it fires.
//!
//! Two implementations ship with the crate:
//!
//! - [`TestScheduler`]: virtual time, advanced explicitly by tests.
//! - [`LocalScheduler`] (feature `scheduler`): tokio timers on the current
//!   thread's `LocalSet`.

use std::{
  cell::{Cell, RefCell},
  fmt::{Debug, Formatter},
  rc::Rc,
};

use futures::future::LocalBoxFuture;
pub use std::time::Duration;

pub mod test_scheduler;
pub use test_scheduler::TestScheduler;

#[cfg(feature = "scheduler")]
mod local_scheduler;
#[cfg(feature = "scheduler")]
pub use local_scheduler::LocalScheduler;

/// The timer/clock collaborator.
///
/// All callbacks run on the thread that owns the scheduler; nothing here is
/// `Send`.
pub trait Scheduler: Clone + 'static {
  /// Runs `task` once after `delay`.
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle;

  /// Runs `task` every `period`, first after one `period` has elapsed, until
  /// the returned handle is cancelled.
  fn schedule_repeating(&self, period: Duration, task: Box<dyn FnMut()>) -> TaskHandle;

  /// Drives `future` to completion. Cancelling the handle drops the future.
  fn spawn(&self, future: LocalBoxFuture<'static, ()>) -> TaskHandle;

  /// Monotonic time elapsed since the scheduler's epoch.
  fn now(&self) -> Duration;

  /// Cancels a scheduled task. Cancelling twice, or cancelling a finished
  /// task, does nothing.
  #[inline]
  fn cancel(&self, handle: &TaskHandle) { handle.cancel() }
}

// ============================================================================
// TaskHandle
// ============================================================================

/// Handle to one scheduled unit of work.
///
/// Cloning shares the same underlying task.
#[derive(Clone, Default)]
pub struct TaskHandle(Rc<TaskHandleInner>);

#[derive(Default)]
struct TaskHandleInner {
  closed: Cell<bool>,
  on_cancel: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl TaskHandle {
  pub fn new() -> Self { Self::default() }

  /// A handle for work that has already run.
  pub fn finished() -> Self {
    let handle = Self::new();
    handle.mark_finished();
    handle
  }

  /// Prevents the task from running (again). A pending callback never
  /// fires after this returns.
  pub fn cancel(&self) {
    if self.0.closed.replace(true) {
      return;
    }
    let hook = self.0.on_cancel.borrow_mut().take();
    if let Some(hook) = hook {
      hook();
    }
  }

  /// `true` once the task has finished or was cancelled.
  #[inline]
  pub fn is_closed(&self) -> bool { self.0.closed.get() }

  /// Registers extra work to run on cancellation, e.g. aborting a runtime
  /// task. Runs immediately when the handle is already cancelled.
  pub(crate) fn on_cancel(&self, hook: impl FnOnce() + 'static) {
    if self.is_closed() {
      hook();
    } else {
      *self.0.on_cancel.borrow_mut() = Some(Box::new(hook));
    }
  }

  pub(crate) fn mark_finished(&self) {
    self.0.closed.set(true);
    self.0.on_cancel.borrow_mut().take();
  }
}

impl Debug for TaskHandle {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TaskHandle").field("is_closed", &self.is_closed()).finish()
  }
}

/// Cancels the handle held in `slot`, if any.
pub(crate) fn cancel_slot(slot: &RefCell<Option<TaskHandle>>) {
  let handle = slot.borrow_mut().take();
  if let Some(handle) = handle {
    handle.cancel();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[rxlite_macro::test]
  fn cancel_runs_hook_once() {
    let hits = Rc::new(Cell::new(0));
    let handle = TaskHandle::new();
    let h = hits.clone();
    handle.on_cancel(move || h.set(h.get() + 1));

    handle.cancel();
    handle.clone().cancel();
    assert!(handle.is_closed());
    assert_eq!(hits.get(), 1);
  }

  #[rxlite_macro::test]
  fn finished_handle_ignores_cancel_hooks() {
    let hits = Rc::new(Cell::new(0));
    let handle = TaskHandle::new();
    let h = hits.clone();
    handle.on_cancel(move || h.set(h.get() + 1));
    handle.mark_finished();
    handle.cancel();
    assert_eq!(hits.get(), 0);

    let late = hits.clone();
    TaskHandle::finished().on_cancel(move || late.set(late.get() + 10));
    assert_eq!(hits.get(), 10);
  }
}
