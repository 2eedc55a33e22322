use std::rc::Rc;

use futures::future::LocalBoxFuture;
use tokio::{
  task::spawn_local,
  time::{interval_at, sleep, Instant, MissedTickBehavior},
};
use tracing::trace;

use super::{Duration, Scheduler, TaskHandle};

/// Real-time scheduler backed by tokio timers.
///
/// Every task is spawned with `tokio::task::spawn_local`, so the scheduler
/// must be used from inside a `LocalSet` (the `#[rxlite_macro::test(local)]`
/// attribute sets one up). Cancelling a handle aborts the tokio task.
#[derive(Clone, Debug)]
pub struct LocalScheduler {
  epoch: Rc<Instant>,
}

impl Default for LocalScheduler {
  fn default() -> Self { Self::new() }
}

impl LocalScheduler {
  /// A scheduler whose clock starts at zero now.
  pub fn new() -> Self { Self { epoch: Rc::new(Instant::now()) } }

  fn run(&self, future: impl std::future::Future<Output = ()> + 'static) -> TaskHandle {
    let handle = TaskHandle::new();
    let finished = handle.clone();
    let join = spawn_local(async move {
      future.await;
      finished.mark_finished();
    });
    handle.on_cancel(move || join.abort());
    handle
  }
}

impl Scheduler for LocalScheduler {
  fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TaskHandle {
    trace!(?delay, "local scheduler queued task");
    self.run(async move {
      sleep(delay).await;
      task();
    })
  }

  fn schedule_repeating(&self, period: Duration, mut task: Box<dyn FnMut()>) -> TaskHandle {
    trace!(?period, "local scheduler queued repeating task");
    self.run(async move {
      let mut ticks = interval_at(Instant::now() + period, period);
      ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
      loop {
        ticks.tick().await;
        task();
      }
    })
  }

  fn spawn(&self, future: LocalBoxFuture<'static, ()>) -> TaskHandle { self.run(future) }

  fn now(&self) -> Duration { self.epoch.elapsed() }
}
