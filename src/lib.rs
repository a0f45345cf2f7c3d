//! Cooperative tick scheduler with software timers, a bounded message
//! queue and a calendar clock.
//!
//! The scheduler re-evaluates every registered task and timer on a fixed
//! time quantum (the tick). Dispatch is single threaded and run to
//! completion: within one tick all due tasks run first, in registration
//! order, then all due timers, so callbacks may freely share state such as
//! the [`queue::Queue`] without any locking. Pacing against real time goes
//! through the [`clock::Monotonic`] trait and an `embedded-hal` delay, so
//! the engine itself stays platform agnostic.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod clock;
pub mod config;
pub mod queue;
pub mod rtcc;
pub mod sched;

pub use clock::Monotonic;
pub use sched::{SchedConfig, SchedCtl, SchedError, Scheduler, TaskId, TimerId};
