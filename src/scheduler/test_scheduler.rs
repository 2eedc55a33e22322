//! Virtual-time scheduler for deterministic tests of time-based operators.
//!
//! Time only moves when a test says so. `advance_by` runs every task due in
//! the window in time order (FIFO for equal deadlines); `flush` runs until
//! the queue is empty. Futures handed to [`Scheduler::spawn`] are driven by a
//! thread-local `LocalPool` every time the clock is advanced.
//!
//! ```rust
//! use rxlite::prelude::*;
//! use std::{cell::RefCell, rc::Rc, time::Duration};
//!
//! TestScheduler::init();
//! let seen = Rc::new(RefCell::new(vec![]));
//! let s = seen.clone();
//! interval(Duration::from_millis(10), TestScheduler)
//!   .unwrap()
//!   .take(3)
//!   .subscribe(move |v| s.borrow_mut().push(v));
//!
//! TestScheduler::advance_by(Duration::from_millis(25));
//! assert_eq!(*seen.borrow(), vec![0, 1]);
//! TestScheduler::advance_by(Duration::from_millis(5));
//! assert_eq!(*seen.borrow(), vec![0, 1, 2]);
//! ```
//!
//! State is thread-local, so tests running on different threads never see
//! each other's clocks.

use std::{cell::RefCell, cmp::Ordering, collections::BinaryHeap};

use futures::{
  executor::{LocalPool, LocalSpawner},
  future::{abortable, LocalBoxFuture},
  task::LocalSpawnExt,
};
use tracing::{trace, warn};

use super::{Duration, Scheduler, TaskHandle};

// ==================== Internal State ====================

#[derive(Default)]
struct TestSchedulerState {
  virtual_time: Duration,
  task_queue: BinaryHeap<ScheduledTask>,
  next_task_id: usize,
  initialized: bool,
}

enum Job {
  Once(Box<dyn FnOnce()>),
  Repeat { period: Duration, task: Box<dyn FnMut()> },
}

struct ScheduledTask {
  scheduled_time: Duration,
  task_id: usize,
  job: Job,
  handle: TaskHandle,
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool {
    self.scheduled_time == other.scheduled_time && self.task_id == other.task_id
  }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by task_id
    other
      .scheduled_time
      .cmp(&self.scheduled_time)
      .then_with(|| other.task_id.cmp(&self.task_id))
  }
}

thread_local! {
  static TEST_SCHEDULER_STATE: RefCell<TestSchedulerState>
    = RefCell::new(TestSchedulerState::default());
  static FUTURE_POOL: RefCell<LocalPool> = RefCell::new(LocalPool::new());
  static FUTURE_SPAWNER: RefCell<LocalSpawner>
    = FUTURE_POOL.with(|pool| RefCell::new(pool.borrow().spawner()));
}

// ==================== TestScheduler ====================

/// A virtual time scheduler for deterministic testing.
///
/// Zero-sized; every instance on a thread shares the same clock and queue.
#[derive(Clone, Copy, Default, Debug)]
pub struct TestScheduler;

impl TestScheduler {
  /// Resets the clock to zero and drops every pending task and future.
  ///
  /// Must be called at the start of each test; the other associated
  /// functions panic otherwise.
  pub fn init() {
    TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();
      state.virtual_time = Duration::ZERO;
      state.task_queue.clear();
      state.next_task_id = 0;
      state.initialized = true;
    });
    let spawner = FUTURE_POOL.with(|pool| {
      let mut pool = pool.try_borrow_mut().ok()?;
      *pool = LocalPool::new();
      Some(pool.spawner())
    });
    if let Some(spawner) = spawner {
      FUTURE_SPAWNER.with(|slot| *slot.borrow_mut() = spawner);
    }
  }

  fn ensure_initialized() {
    TEST_SCHEDULER_STATE.with(|state| {
      assert!(
        state.borrow().initialized,
        "TestScheduler::init() must be called before using the scheduler"
      );
    });
  }

  /// The current virtual time.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn current_time() -> Duration {
    Self::ensure_initialized();
    TEST_SCHEDULER_STATE.with(|state| state.borrow().virtual_time)
  }

  /// Number of queued timer tasks that have not been cancelled.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn pending_count() -> usize {
    Self::ensure_initialized();
    TEST_SCHEDULER_STATE
      .with(|state| state.borrow().task_queue.iter().filter(|t| !t.handle.is_closed()).count())
  }

  /// `true` when no live timer task is queued.
  pub fn is_empty() -> bool { Self::pending_count() == 0 }

  /// Advances virtual time by `duration`, running every task that falls due
  /// on the way, including tasks scheduled by those tasks.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn advance_by(duration: Duration) {
    Self::ensure_initialized();
    let target_time = TEST_SCHEDULER_STATE.with(|state| state.borrow().virtual_time + duration);

    Self::execute_tasks_until(Some(target_time));

    TEST_SCHEDULER_STATE.with(|state| {
      state.borrow_mut().virtual_time = target_time;
    });
  }

  /// Runs queued tasks, moving the clock to each deadline, until the queue is
  /// empty. Never returns while a repeating task stays live, so tests of
  /// `interval` use `advance_by` instead.
  ///
  /// # Panics
  ///
  /// Panics if `init()` has not been called first.
  pub fn flush() {
    Self::ensure_initialized();
    Self::execute_tasks_until(None);
  }

  fn run_futures() {
    FUTURE_POOL.with(|pool| {
      // A future that advances the clock re-enters here; the outer call is
      // already driving the pool.
      if let Ok(mut pool) = pool.try_borrow_mut() {
        pool.run_until_stalled();
      }
    });
  }

  fn execute_tasks_until(target_time: Option<Duration>) {
    loop {
      Self::run_futures();

      let task = TEST_SCHEDULER_STATE.with(|state| {
        let mut state = state.borrow_mut();
        loop {
          let due = state
            .task_queue
            .peek()
            .is_some_and(|peek| target_time.is_none_or(|limit| peek.scheduled_time <= limit));
          if !due {
            return None;
          }
          let scheduled_task = state.task_queue.pop()?;
          if scheduled_task.handle.is_closed() {
            continue;
          }
          state.virtual_time = scheduled_task.scheduled_time;
          return Some(scheduled_task);
        }
      });

      let Some(ScheduledTask { task_id, job, handle, .. }) = task else {
        break;
      };
      trace!(task_id, "test scheduler running task");

      match job {
        Job::Once(task) => {
          handle.mark_finished();
          task();
        }
        Job::Repeat { period, mut task } => {
          task();
          if !handle.is_closed() {
            TEST_SCHEDULER_STATE.with(|state| {
              let mut state = state.borrow_mut();
              let at = state.virtual_time + period;
              Self::push(&mut state, at, Job::Repeat { period, task }, handle);
            });
          }
        }
      }
    }
    Self::run_futures();
  }

  fn push(state: &mut TestSchedulerState, scheduled_time: Duration, job: Job, handle: TaskHandle) {
    let task_id = state.next_task_id;
    state.next_task_id += 1;
    state.task_queue.push(ScheduledTask { scheduled_time, task_id, job, handle });
  }

  fn enqueue(delay: Duration, job: Job) -> TaskHandle {
    Self::ensure_initialized();
    let handle = TaskHandle::new();
    TEST_SCHEDULER_STATE.with(|state| {
      let mut state = state.borrow_mut();
      let at = state.virtual_time + delay;
      trace!(at = ?at, "test scheduler queued task");
      Self::push(&mut state, at, job, handle.clone());
    });
    handle
  }
}

impl Scheduler for TestScheduler {
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle {
    Self::enqueue(delay, Job::Once(task))
  }

  fn schedule_repeating(&self, period: Duration, task: Box<dyn FnMut()>) -> TaskHandle {
    Self::enqueue(period, Job::Repeat { period, task })
  }

  fn spawn(&self, future: LocalBoxFuture<'static, ()>) -> TaskHandle {
    Self::ensure_initialized();
    let handle = TaskHandle::new();
    let (future, abort) = abortable(future);
    let finished = handle.clone();
    let spawned = FUTURE_SPAWNER.with(|spawner| {
      spawner.borrow().spawn_local(async move {
        if future.await.is_ok() {
          finished.mark_finished();
        }
      })
    });
    match spawned {
      Ok(()) => handle.on_cancel(move || abort.abort()),
      Err(err) => {
        warn!(%err, "test scheduler failed to spawn future");
        handle.mark_finished();
      }
    }
    handle
  }

  fn now(&self) -> Duration { Self::current_time() }
}

#[cfg(test)]
mod tests {
  use std::{
    cell::{Cell, RefCell},
    mem,
    rc::Rc,
  };

  use super::*;

  #[rxlite_macro::test]
  fn zero_sized_and_copy() {
    assert_eq!(mem::size_of::<TestScheduler>(), 0);
    let s1 = TestScheduler;
    let _s2 = s1;
    let _s3 = s1;
  }

  #[rxlite_macro::test]
  fn init_resets_clock() {
    TestScheduler::init();
    TestScheduler::advance_by(Duration::from_millis(100));
    assert_eq!(TestScheduler::current_time(), Duration::from_millis(100));
    assert_eq!(TestScheduler.now(), Duration::from_millis(100));

    TestScheduler::init();
    assert_eq!(TestScheduler::current_time(), Duration::ZERO);
    assert!(TestScheduler::is_empty());
  }

  #[rxlite_macro::test]
  #[should_panic(expected = "TestScheduler::init() must be called")]
  fn panics_without_init() {
    TEST_SCHEDULER_STATE.with(|s| s.borrow_mut().initialized = false);
    TestScheduler::current_time();
  }

  #[rxlite_macro::test]
  fn immediate_and_delayed() {
    TestScheduler::init();
    let results = Rc::new(RefCell::new(Vec::new()));

    let r = results.clone();
    TestScheduler.schedule(Duration::ZERO, Box::new(move || r.borrow_mut().push("immediate")));
    let r = results.clone();
    TestScheduler
      .schedule(Duration::from_millis(100), Box::new(move || r.borrow_mut().push("delayed")));
    assert_eq!(TestScheduler::pending_count(), 2);

    TestScheduler::advance_by(Duration::ZERO);
    assert_eq!(*results.borrow(), vec!["immediate"]);

    TestScheduler::advance_by(Duration::from_millis(100));
    assert_eq!(*results.borrow(), vec!["immediate", "delayed"]);
  }

  #[rxlite_macro::test]
  fn cancelled_task_never_runs() {
    TestScheduler::init();
    let executed = Rc::new(Cell::new(false));
    let e = executed.clone();

    let handle = TestScheduler.schedule(Duration::from_millis(100), Box::new(move || e.set(true)));
    TestScheduler.cancel(&handle);
    assert_eq!(TestScheduler::pending_count(), 0);

    TestScheduler::advance_by(Duration::from_millis(150));
    assert!(!executed.get());
  }

  #[rxlite_macro::test]
  fn fifo_ordering_same_time() {
    TestScheduler::init();
    let order = Rc::new(RefCell::new(Vec::new()));

    for i in 0..5 {
      let o = order.clone();
      TestScheduler.schedule(Duration::from_millis(100), Box::new(move || o.borrow_mut().push(i)));
    }

    TestScheduler::advance_by(Duration::from_millis(100));
    assert_eq!(*order.borrow(), vec![0, 1, 2, 3, 4]);
  }

  #[rxlite_macro::test]
  fn tasks_beyond_target_stay_queued() {
    TestScheduler::init();
    let executed = Rc::new(RefCell::new(Vec::new()));

    for at in [150, 50] {
      let e = executed.clone();
      TestScheduler.schedule(Duration::from_millis(at), Box::new(move || e.borrow_mut().push(at)));
    }

    TestScheduler::advance_by(Duration::from_millis(100));
    assert_eq!(*executed.borrow(), vec![50]);
    assert_eq!(TestScheduler::pending_count(), 1);

    TestScheduler::advance_by(Duration::from_millis(50));
    assert_eq!(*executed.borrow(), vec![50, 150]);
    assert!(TestScheduler::is_empty());
  }

  #[rxlite_macro::test]
  fn repeating_task_until_cancelled() {
    TestScheduler::init();
    let ticks = Rc::new(RefCell::new(Vec::new()));
    let t = ticks.clone();

    let handle = TestScheduler.schedule_repeating(
      Duration::from_millis(10),
      Box::new(move || t.borrow_mut().push(TestScheduler::current_time().as_millis())),
    );
    TestScheduler::advance_by(Duration::from_millis(35));
    assert_eq!(*ticks.borrow(), vec![10, 20, 30]);

    handle.cancel();
    TestScheduler::advance_by(Duration::from_millis(100));
    assert_eq!(ticks.borrow().len(), 3);
    assert!(TestScheduler::is_empty());
  }

  #[rxlite_macro::test]
  fn task_scheduled_from_task_runs_in_same_advance() {
    TestScheduler::init();
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();

    TestScheduler.schedule(
      Duration::from_millis(10),
      Box::new(move || {
        h.set(h.get() + 1);
        let h = h.clone();
        TestScheduler.schedule(Duration::from_millis(10), Box::new(move || h.set(h.get() + 1)));
      }),
    );

    TestScheduler::advance_by(Duration::from_millis(20));
    assert_eq!(hits.get(), 2);
  }

  #[rxlite_macro::test]
  fn spawned_future_runs_on_advance_and_can_be_cancelled() {
    TestScheduler::init();
    let executed = Rc::new(Cell::new(0));

    let e = executed.clone();
    let done = TestScheduler.spawn(Box::pin(async move { e.set(e.get() + 1) }));
    let e = executed.clone();
    let aborted = TestScheduler.spawn(Box::pin(async move { e.set(e.get() + 10) }));
    aborted.cancel();

    assert_eq!(executed.get(), 0);
    TestScheduler::flush();
    assert_eq!(executed.get(), 1);
    assert!(done.is_closed());
  }
}
