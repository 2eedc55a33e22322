//! Everything needed to build and consume streams with one import.

#[cfg(feature = "scheduler")]
pub use crate::scheduler::LocalScheduler;
pub use crate::{
  error::{ConfigError, RequestError},
  event::{EventSource, EventTarget, Listener},
  observable::{
    self, create, empty, from_event, from_future, from_iter, from_result_future, interval,
    never, request, request_json, throw_err, timer, Observable, Subscriber, Teardown,
  },
  observer::{IntoObserver, ObserverFns},
  of,
  ops::*,
  pipe,
  scheduler::{Duration, Scheduler, TaskHandle, TestScheduler},
  subscription::{Subscription, SubscriptionGuard},
  transport::{CancellationToken, Request, Response, Transport},
};
