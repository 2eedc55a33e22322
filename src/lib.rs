//! # rxlite: a small push-based reactive stream engine
//!
//! An [`Observable`] is an inert, reusable description of a sequence of
//! values. Subscribing runs its producer, which pushes `next` values and at
//! most one terminal `error` or `complete` to the observer. Operators are
//! unary `Observable -> Observable` functions composed with
//! [`Observable::pipe`] or as chaining methods.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("Value: {}", v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A producer function; each subscription runs it afresh |
//! | [`ObserverFns`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Scheduler`] | The timer service the time-based operators run on |
//!
//! Everything is single-threaded: observables, subscriptions and schedulers
//! are `!Send` and hold their state in `Rc`/`RefCell`.
//!
//! ## Feature Flags
//!
//! - **`scheduler`** (default): the tokio-backed [`LocalScheduler`].
//!
//! [`Observable`]: observable::Observable
//! [`Observable::pipe`]: observable::Observable::pipe
//! [`ObserverFns`]: observer::ObserverFns
//! [`Subscription`]: subscription::Subscription
//! [`Scheduler`]: scheduler::Scheduler
//! [`LocalScheduler`]: scheduler::LocalScheduler

pub mod error;
pub mod event;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod subscription;
pub mod transport;

pub use prelude::*;

